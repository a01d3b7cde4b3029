use crate::render::escape::escape_html;
use crate::render::node::{Block, Document, Inline, TableData};

/// Serializes a parsed document. Text nodes are already entity-escaped;
/// code and attribute values are escaped here, at the emit boundary.
pub fn document_to_html(document: &Document) -> String {
    document
        .blocks
        .iter()
        .map(block_to_html)
        .collect::<Vec<_>>()
        .join("\n")
}

fn block_to_html(block: &Block) -> String {
    match block {
        Block::Heading { level, inlines } => {
            format!("<h{level}>{}</h{level}>", inlines_to_html(inlines))
        }
        Block::Paragraph { inlines } => format!("<p>{}</p>", inlines_to_html(inlines)),
        Block::Quote { lines } => {
            let body = lines
                .iter()
                .map(|line| inlines_to_html(line))
                .collect::<Vec<_>>()
                .join("<br>");
            format!("<blockquote>{body}</blockquote>")
        }
        Block::List { ordered, items } => {
            let tag = if *ordered { "ol" } else { "ul" };
            let body = items
                .iter()
                .map(|item| format!("<li>{}</li>", inlines_to_html(item)))
                .collect::<String>();
            format!("<{tag}>{body}</{tag}>")
        }
        Block::Table { header, rows, data } => table_to_html(header, rows, data),
        Block::CodeFence { language, code } => code_fence_to_html(language.as_deref(), code),
        Block::Rule => "<hr>".to_string(),
    }
}

/// A fenced block renders with a toolbar: a copy action carrying the exact
/// original text, and a preview action only for HTML fences, which hand
/// their body to an external sandboxed surface.
fn code_fence_to_html(language: Option<&str>, code: &str) -> String {
    let escaped = escape_html(code);
    let mut html = String::from("<div class=\"code-block\"");
    if let Some(language) = language {
        html.push_str(&format!(" data-language=\"{}\"", escape_html(language)));
    }
    html.push_str("><div class=\"code-toolbar\">");
    html.push_str(&format!(
        "<button class=\"code-copy\" data-code=\"{escaped}\">Copy</button>"
    ));
    if language.is_some_and(|language| language.eq_ignore_ascii_case("html")) {
        html.push_str(&format!(
            "<button class=\"code-preview\" data-code=\"{escaped}\">Preview</button>"
        ));
    }
    html.push_str("</div><pre><code");
    if let Some(language) = language {
        html.push_str(&format!(" class=\"language-{}\"", escape_html(language)));
    }
    html.push_str(&format!(">{escaped}</code></pre></div>"));
    html
}

/// Tables carry their original row data in a `data-table` attribute so
/// spreadsheet export can recover cells without scraping markup.
fn table_to_html(header: &[Vec<Inline>], rows: &[Vec<Vec<Inline>>], data: &TableData) -> String {
    let data_json = serde_json::to_string(data).unwrap_or_default();
    let mut html = format!(
        "<div class=\"table-wrap\" data-table=\"{}\"><table><thead><tr>",
        escape_html(&data_json)
    );
    for cell in header {
        html.push_str(&format!("<th>{}</th>", inlines_to_html(cell)));
    }
    html.push_str("</tr></thead><tbody>");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", inlines_to_html(cell)));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table></div>");
    html
}

pub fn inlines_to_html(inlines: &[Inline]) -> String {
    let mut html = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(escaped) => html.push_str(escaped),
            Inline::Code(code) => {
                html.push_str(&format!("<code>{}</code>", escape_html(code)));
            }
            Inline::Strong(children) => {
                html.push_str(&format!("<strong>{}</strong>", inlines_to_html(children)));
            }
            Inline::Emphasis(children) => {
                html.push_str(&format!("<em>{}</em>", inlines_to_html(children)));
            }
            Inline::Strike(children) => {
                html.push_str(&format!("<del>{}</del>", inlines_to_html(children)));
            }
            Inline::Link { href, children } => {
                html.push_str(&format!(
                    "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                    escape_html(href),
                    inlines_to_html(children)
                ));
            }
        }
    }
    html
}
