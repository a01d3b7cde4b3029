/// Escapes text for safe interpolation into markup, element bodies and
/// attribute values alike. Runs exactly once per render pass, on the raw
/// remainder left after code protection; escaped output must never be fed
/// back through.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Undoes [`escape_html`] for contexts that need the original text back, like
/// link destinations and export data. Handles only the five entities the
/// escaper produces; `&amp;` is decoded last so doubly-escaped text survives
/// one round intact.
pub fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
