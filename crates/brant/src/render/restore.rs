use crate::render::node::{plain_text, Block, Document, Inline, TableData};
use crate::render::protect::{CodeArena, FENCE_CLOSE, FENCE_OPEN, INLINE_CLOSE, INLINE_OPEN};

/// Replaces every placeholder token with its stored span. Fence tokens stand
/// on their own line, so resolving one splits its paragraph into the blocks
/// around a `CodeFence`; inline tokens become `Inline::Code` nodes in place.
/// The two token sets are disjoint, so resolution order between them does
/// not matter. Table export data is computed here, once cells are final.
pub fn restore(document: Document, arena: &CodeArena) -> Document {
    let mut blocks: Vec<Block> = Vec::new();
    for block in document.blocks {
        match block {
            Block::Paragraph { inlines } => restore_paragraph(inlines, arena, &mut blocks),
            Block::Heading { level, inlines } => blocks.push(Block::Heading {
                level,
                inlines: restore_inlines(inlines, arena),
            }),
            Block::Quote { lines } => blocks.push(Block::Quote {
                lines: lines
                    .into_iter()
                    .map(|line| restore_inlines(line, arena))
                    .collect(),
            }),
            Block::List { ordered, items } => blocks.push(Block::List {
                ordered,
                items: items
                    .into_iter()
                    .map(|item| restore_inlines(item, arena))
                    .collect(),
            }),
            Block::Table { header, rows, .. } => blocks.push(restore_table(header, rows, arena)),
            Block::CodeFence { .. } | Block::Rule => blocks.push(block),
        }
    }
    Document { blocks }
}

fn restore_table(
    header: Vec<Vec<Inline>>,
    rows: Vec<Vec<Vec<Inline>>>,
    arena: &CodeArena,
) -> Block {
    let header: Vec<Vec<Inline>> = header
        .into_iter()
        .map(|cell| restore_inlines(cell, arena))
        .collect();
    let rows: Vec<Vec<Vec<Inline>>> = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| restore_inlines(cell, arena))
                .collect()
        })
        .collect();
    let mut data_rows: Vec<Vec<String>> = vec![header.iter().map(|cell| plain_text(cell)).collect()];
    data_rows.extend(
        rows.iter()
            .map(|row| row.iter().map(|cell| plain_text(cell)).collect::<Vec<_>>()),
    );
    Block::Table {
        header,
        rows,
        data: TableData {
            title: None,
            rows: data_rows,
        },
    }
}

fn restore_paragraph(inlines: Vec<Inline>, arena: &CodeArena, out: &mut Vec<Block>) {
    let mut pending: Vec<Inline> = Vec::new();
    for inline in inlines {
        match inline {
            Inline::Text(text) if text.contains(FENCE_OPEN) => {
                let mut rest = text.as_str();
                while let Some((before, index, after)) = split_token(rest, FENCE_OPEN, FENCE_CLOSE)
                {
                    if !before.trim().is_empty() {
                        pending.push(Inline::Text(before.to_string()));
                    }
                    flush_paragraph(&mut pending, arena, out);
                    if let Some(entry) = arena.fence(index) {
                        out.push(Block::CodeFence {
                            language: entry.language.clone(),
                            code: entry.code.clone(),
                        });
                    }
                    rest = after;
                }
                if !rest.trim().is_empty() {
                    pending.push(Inline::Text(rest.to_string()));
                }
            }
            other => pending.push(other),
        }
    }
    flush_paragraph(&mut pending, arena, out);
}

fn flush_paragraph(pending: &mut Vec<Inline>, arena: &CodeArena, out: &mut Vec<Block>) {
    if pending.is_empty() {
        return;
    }
    let inlines = restore_inlines(std::mem::take(pending), arena);
    if !inlines.is_empty() {
        out.push(Block::Paragraph { inlines });
    }
}

fn restore_inlines(inlines: Vec<Inline>, arena: &CodeArena) -> Vec<Inline> {
    let mut out: Vec<Inline> = Vec::new();
    for inline in inlines {
        match inline {
            Inline::Text(text) if text.contains(INLINE_OPEN) => {
                let mut rest = text.as_str();
                while let Some((before, index, after)) =
                    split_token(rest, INLINE_OPEN, INLINE_CLOSE)
                {
                    if !before.is_empty() {
                        out.push(Inline::Text(before.to_string()));
                    }
                    if let Some(code) = arena.inline_span(index) {
                        out.push(Inline::Code(code.to_string()));
                    }
                    rest = after;
                }
                if !rest.is_empty() {
                    out.push(Inline::Text(rest.to_string()));
                }
            }
            Inline::Strong(children) => out.push(Inline::Strong(restore_inlines(children, arena))),
            Inline::Emphasis(children) => {
                out.push(Inline::Emphasis(restore_inlines(children, arena)))
            }
            Inline::Strike(children) => out.push(Inline::Strike(restore_inlines(children, arena))),
            Inline::Link { href, children } => out.push(Inline::Link {
                href,
                children: restore_inlines(children, arena),
            }),
            other => out.push(other),
        }
    }
    out
}

/// Splits `text` around the first `{open}{digits}{close}` token, returning
/// the prefix, the parsed index, and the suffix.
fn split_token(text: &str, open: char, close: char) -> Option<(&str, usize, &str)> {
    let open_at = text.find(open)?;
    let close_at = open_at + text[open_at..].find(close)?;
    let index: usize = text[open_at + open.len_utf8()..close_at].parse().ok()?;
    Some((
        &text[..open_at],
        index,
        &text[close_at + close.len_utf8()..],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::block::parse_blocks;
    use crate::render::inline::style_blocks;
    use crate::render::protect;

    fn pipeline(raw: &str) -> Document {
        let (protected, arena) = protect::protect(raw);
        let document = style_blocks(parse_blocks(&protected));
        restore(document, &arena)
    }

    #[test]
    fn fence_round_trips_exactly() {
        let document = pipeline("```js\nconst x = 1;\n```");
        assert_eq!(
            document.blocks,
            vec![Block::CodeFence {
                language: Some("js".to_string()),
                code: "const x = 1;".to_string(),
            }]
        );
    }

    #[test]
    fn fence_between_paragraphs_keeps_order() {
        let document = pipeline("before\n```\ncode\n```\nafter");
        assert_eq!(document.blocks.len(), 3);
        assert!(matches!(document.blocks[0], Block::Paragraph { .. }));
        assert!(matches!(document.blocks[1], Block::CodeFence { .. }));
        assert!(matches!(document.blocks[2], Block::Paragraph { .. }));
    }

    #[test]
    fn inline_code_is_restored_in_place() {
        let document = pipeline("call `f(x)` twice");
        assert_eq!(
            document.blocks,
            vec![Block::Paragraph {
                inlines: vec![
                    Inline::Text("call ".to_string()),
                    Inline::Code("f(x)".to_string()),
                    Inline::Text(" twice".to_string()),
                ]
            }]
        );
    }

    #[test]
    fn inline_code_keeps_raw_markup_text() {
        let document = pipeline("`<b>&</b>`");
        assert_eq!(
            document.blocks,
            vec![Block::Paragraph {
                inlines: vec![Inline::Code("<b>&</b>".to_string())]
            }]
        );
    }

    #[test]
    fn emphasized_code_span_nests() {
        let document = pipeline("*`x`*");
        assert_eq!(
            document.blocks,
            vec![Block::Paragraph {
                inlines: vec![Inline::Emphasis(vec![Inline::Code("x".to_string())])]
            }]
        );
    }

    #[test]
    fn code_inside_heading_is_restored() {
        let document = pipeline("# see `main`");
        match &document.blocks[0] {
            Block::Heading { inlines, .. } => {
                assert_eq!(
                    inlines,
                    &vec![
                        Inline::Text("see ".to_string()),
                        Inline::Code("main".to_string()),
                    ]
                );
            }
            other => panic!("expected heading, got {other:?}"),
        }
    }

    #[test]
    fn table_export_rows_carry_original_text() {
        let document = pipeline("|Col & Name|Code|\n|-|-|\n|a & b|`x<y`|");
        match &document.blocks[0] {
            Block::Table { data, .. } => {
                assert_eq!(data.rows[0], vec!["Col & Name", "Code"]);
                assert_eq!(data.rows[1], vec!["a & b", "x<y"]);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }
}
