use serde::{Deserialize, Serialize};

use crate::render::escape;

/// The parsed form of one message's text. Rendering a `Document` to HTML (or
/// any other surface) is a separate step from parsing it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Block-level node. `Inline::Text` children hold entity-escaped text;
/// `CodeFence` and `Inline::Code` hold the original code untouched and are
/// escaped only at emit time.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading {
        level: u8,
        inlines: Vec<Inline>,
    },
    Paragraph {
        inlines: Vec<Inline>,
    },
    Quote {
        lines: Vec<Vec<Inline>>,
    },
    List {
        ordered: bool,
        items: Vec<Vec<Inline>>,
    },
    Table {
        header: Vec<Vec<Inline>>,
        rows: Vec<Vec<Vec<Inline>>>,
        /// Original cell text for export consumers, filled in during
        /// placeholder restoration. `rows[0]` is the header row.
        data: TableData,
    },
    CodeFence {
        language: Option<String>,
        code: String,
    },
    Rule,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Code(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Strike(Vec<Inline>),
    Link { href: String, children: Vec<Inline> },
}

/// Row data carried alongside a rendered table so spreadsheet export can
/// recover the original cells without scraping markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TableData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub rows: Vec<Vec<String>>,
}

/// Human-readable text of an inline run: entities decoded, code spans taken
/// verbatim, link labels kept and destinations dropped.
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut text = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(escaped) => text.push_str(&escape::decode_entities(escaped)),
            Inline::Code(code) => text.push_str(code),
            Inline::Strong(children)
            | Inline::Emphasis(children)
            | Inline::Strike(children)
            | Inline::Link { children, .. } => text.push_str(&plain_text(children)),
        }
    }
    text
}
