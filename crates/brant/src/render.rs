//! The markdown pipeline: protect code, group lines into blocks, style
//! inline text, restore protected spans, then (optionally) emit HTML.
//!
//! Each stage is a pure function and the whole pass is re-run over the full
//! accumulated text on every streamed chunk, because block boundaries can
//! shift as later chunks arrive. Per-call state lives in a [`protect::CodeArena`],
//! so concurrently streaming messages cannot cross-talk.

pub mod block;
pub mod escape;
pub mod html;
pub mod inline;
pub mod node;
pub mod protect;
pub mod restore;

pub use node::{Block, Document, Inline, TableData};

/// Receives the body of an HTML fence for isolated preview. The handoff is
/// one-way: the surface gets a string and must not share scripting or
/// mutable state with the parser or the host page.
pub trait PreviewSurface {
    fn present(&self, code: &str, language: &str);
}

/// Offers every previewable fence in the document to the surface. Only
/// fences whose language tag equals `html` case-insensitively qualify.
pub fn offer_previews(document: &Document, surface: &dyn PreviewSurface) {
    for block in &document.blocks {
        if let Block::CodeFence {
            language: Some(language),
            code,
        } = block
        {
            if language.eq_ignore_ascii_case("html") {
                surface.present(code, language);
            }
        }
    }
}

/// Parses raw model text into a document tree.
pub fn parse(text: &str) -> Document {
    let (protected, arena) = protect::protect(text);
    let blocks = block::parse_blocks(&protected);
    let document = inline::style_blocks(blocks);
    let document = restore::restore(document, &arena);
    tracing::trace!(blocks = document.blocks.len(), "parsed markdown document");
    document
}

/// Parses and serializes in one step.
pub fn render_html(text: &str) -> String {
    html::document_to_html(&parse(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_is_a_pure_function_of_the_text() {
        let text = "# Hi\nsome *text* with `code`";
        assert_eq!(render_html(text), render_html(text));
    }

    #[test]
    fn full_pipeline_end_to_end() {
        let html = render_html("# Title\n\nA **bold** claim.\n\n```html\n<b>x</b>\n```");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<p>A <strong>bold</strong> claim.</p>"));
        assert!(html.contains("code-preview"));
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
    }

    #[test]
    fn raw_markup_in_prose_is_neutralized() {
        let html = render_html("<img src=x onerror=alert(1)>");
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img"));
    }

    #[test]
    fn padded_inline_code_renders_trimmed() {
        let html = render_html("use ` x ` here");
        assert!(html.contains("<code>x</code>"));
    }

    #[test]
    fn whitespace_only_input_is_an_empty_document() {
        assert!(parse("").is_empty());
        assert!(parse("  \n\n ").is_empty());
    }

    #[test]
    fn only_html_fences_are_offered_for_preview() {
        use std::cell::RefCell;

        struct Recorder {
            seen: RefCell<Vec<String>>,
        }
        impl PreviewSurface for Recorder {
            fn present(&self, code: &str, _language: &str) {
                self.seen.borrow_mut().push(code.to_string());
            }
        }

        let document = parse("```HTML\n<p>a</p>\n```\n```js\nlet x;\n```");
        let surface = Recorder {
            seen: RefCell::new(Vec::new()),
        };
        offer_previews(&document, &surface);
        assert_eq!(surface.seen.into_inner(), vec!["<p>a</p>".to_string()]);
    }
}
