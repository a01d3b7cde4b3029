use lazy_static::lazy_static;
use regex::Regex;

use crate::render::block::RawBlock;
use crate::render::escape;
use crate::render::node::{Block, Document, Inline, TableData};

lazy_static! {
    static ref LINK: Regex = Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap();
}

/// Applies inline styling to every text-bearing block and produces the
/// public document tree. Headings keep their text unstyled; paragraph, list,
/// quote and table-cell text get the full pass sequence. Table export data
/// is filled in by the restorer once placeholders are resolved.
pub fn style_blocks(blocks: Vec<RawBlock>) -> Document {
    let blocks = blocks.into_iter().map(style_block).collect();
    Document { blocks }
}

fn style_block(block: RawBlock) -> Block {
    match block {
        RawBlock::Heading { level, text } => Block::Heading {
            level,
            inlines: vec![Inline::Text(text)],
        },
        RawBlock::Paragraph { text } => Block::Paragraph {
            inlines: style_text(&text),
        },
        RawBlock::Quote { lines } => Block::Quote {
            lines: lines.iter().map(|line| style_text(line)).collect(),
        },
        RawBlock::List { ordered, items } => Block::List {
            ordered,
            items: items.iter().map(|item| style_text(item)).collect(),
        },
        RawBlock::Table { header, rows } => Block::Table {
            header: header.iter().map(|cell| style_text(cell)).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| style_text(cell)).collect())
                .collect(),
            data: TableData::default(),
        },
        RawBlock::Rule => Block::Rule,
    }
}

/// Pass order is load-bearing: links first so destinations are never
/// styled, then double-marker emphasis before single markers so `**x**`
/// is not read as two italics, strikethrough last.
pub fn style_text(text: &str) -> Vec<Inline> {
    let inlines = scan_links(text);
    let inlines = apply_to_text(inlines, scan_strong);
    let inlines = apply_to_text(inlines, scan_emphasis);
    apply_to_text(inlines, scan_strike)
}

/// Runs a scanner over every text run, descending into containers produced
/// by earlier passes. Code placeholders are opaque here and pass through.
fn apply_to_text(inlines: Vec<Inline>, scan: fn(&str) -> Vec<Inline>) -> Vec<Inline> {
    let mut out = Vec::with_capacity(inlines.len());
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.extend(scan(&text)),
            Inline::Strong(children) => out.push(Inline::Strong(apply_to_text(children, scan))),
            Inline::Emphasis(children) => out.push(Inline::Emphasis(apply_to_text(children, scan))),
            Inline::Strike(children) => out.push(Inline::Strike(apply_to_text(children, scan))),
            Inline::Link { href, children } => out.push(Inline::Link {
                href,
                children: apply_to_text(children, scan),
            }),
            other => out.push(other),
        }
    }
    out
}

/// `[label](url)`. The destination is decoded back from the escape pass,
/// since `&amp;` is never valid inside a real URL; it is re-escaped for the
/// attribute context at emit time.
fn scan_links(text: &str) -> Vec<Inline> {
    let mut out: Vec<Inline> = Vec::new();
    let mut last = 0;
    for caps in LINK.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            out.push(Inline::Text(text[last..whole.start()].to_string()));
        }
        out.push(Inline::Link {
            href: escape::decode_entities(caps[2].trim()),
            children: vec![Inline::Text(caps[1].to_string())],
        });
        last = whole.end();
    }
    if last < text.len() {
        out.push(Inline::Text(text[last..].to_string()));
    }
    out
}

fn scan_strong(text: &str) -> Vec<Inline> {
    scan_double_marker(text, &["**", "__"], Inline::Strong)
}

fn scan_strike(text: &str) -> Vec<Inline> {
    scan_double_marker(text, &["~~"], Inline::Strike)
}

/// Pairs two-character markers lazily: the first closing marker after a
/// non-empty interior wins. Unpaired markers stay literal. One forward
/// scan, no backtracking.
fn scan_double_marker(
    text: &str,
    markers: &[&str],
    wrap: fn(Vec<Inline>) -> Inline,
) -> Vec<Inline> {
    let mut out: Vec<Inline> = Vec::new();
    let mut literal = String::new();
    let mut rest = text;
    while !rest.is_empty() {
        let mut earliest: Option<(usize, &str)> = None;
        for marker in markers {
            if let Some(position) = rest.find(marker) {
                if earliest.map_or(true, |(best, _)| position < best) {
                    earliest = Some((position, marker));
                }
            }
        }
        let Some((open, marker)) = earliest else {
            literal.push_str(rest);
            break;
        };
        let interior_start = open + marker.len();
        match rest[interior_start..].find(marker) {
            Some(length) if length > 0 => {
                literal.push_str(&rest[..open]);
                if !literal.is_empty() {
                    out.push(Inline::Text(std::mem::take(&mut literal)));
                }
                let interior = &rest[interior_start..interior_start + length];
                out.push(wrap(vec![Inline::Text(interior.to_string())]));
                rest = &rest[interior_start + length + marker.len()..];
            }
            _ => {
                literal.push_str(&rest[..interior_start]);
                rest = &rest[interior_start..];
            }
        }
    }
    if !literal.is_empty() {
        out.push(Inline::Text(literal));
    }
    out
}

/// Single `*`/`_` with boundary checks so markers inside a word, as in
/// `a*b*c` or `snake_case_name`, are not emphasis.
fn scan_emphasis(text: &str) -> Vec<Inline> {
    let chars: Vec<char> = text.chars().collect();
    let mut out: Vec<Inline> = Vec::new();
    let mut literal = String::new();
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        if (ch == '*' || ch == '_') && opens_emphasis(&chars, i) {
            if let Some(close) = find_emphasis_close(&chars, i) {
                if !literal.is_empty() {
                    out.push(Inline::Text(std::mem::take(&mut literal)));
                }
                let interior: String = chars[i + 1..close].iter().collect();
                out.push(Inline::Emphasis(vec![Inline::Text(interior)]));
                i = close + 1;
                continue;
            }
        }
        literal.push(ch);
        i += 1;
    }
    if !literal.is_empty() {
        out.push(Inline::Text(literal));
    }
    out
}

fn opens_emphasis(chars: &[char], i: usize) -> bool {
    let marker = chars[i];
    let boundary_before = i == 0 || !chars[i - 1].is_alphanumeric();
    let openable_after = chars
        .get(i + 1)
        .map_or(false, |&next| !next.is_whitespace() && next != marker);
    boundary_before && openable_after
}

fn find_emphasis_close(chars: &[char], open: usize) -> Option<usize> {
    let marker = chars[open];
    let mut i = open + 2;
    while i < chars.len() {
        if chars[i] == marker
            && !chars[i - 1].is_whitespace()
            && chars.get(i + 1).map_or(true, |&next| !next.is_alphanumeric())
        {
            return Some(i);
        }
        i += 1;
    }
    None
}
