use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HEADING: Regex = Regex::new(r"^(#{1,6})\s+(.+)$").unwrap();
    static ref RULE: Regex = Regex::new(r"^(?:-{3,}|\*{3,}|_{3,})$").unwrap();
    static ref UNORDERED_ITEM: Regex = Regex::new(r"^[-*+]\s+(.+)$").unwrap();
    static ref ORDERED_ITEM: Regex = Regex::new(r"^\d+\.\s+(.+)$").unwrap();
    static ref SEPARATOR_CELL: Regex = Regex::new(r"^:?-+:?$").unwrap();
}

/// Quote prefix as it appears after escaping.
const QUOTE_PREFIX: &str = "&gt; ";

/// Line groups recognized by the block pass. Text is still escaped and may
/// still contain placeholder tokens; inline styling and restoration happen
/// downstream.
#[derive(Debug, Clone, PartialEq)]
pub enum RawBlock {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    Quote { lines: Vec<String> },
    List { ordered: bool, items: Vec<String> },
    Table { header: Vec<String>, rows: Vec<Vec<String>> },
    Rule,
}

/// Groups lines into blocks. Tables are tried first so a cell that happens
/// to start with `#` or a bullet is not mis-parsed; any line matching no
/// rule becomes its own paragraph, and blank lines are dropped.
pub fn parse_blocks(text: &str) -> Vec<RawBlock> {
    let lines: Vec<&str> = text.split('\n').map(str::trim).collect();
    let mut blocks: Vec<RawBlock> = Vec::new();
    let mut index = 0;
    while index < lines.len() {
        let line = lines[index];
        if line.is_empty() {
            index += 1;
            continue;
        }
        if let Some((table, consumed)) = try_table(&lines[index..]) {
            blocks.push(table);
            index += consumed;
            continue;
        }
        if let Some(caps) = HEADING.captures(line) {
            blocks.push(RawBlock::Heading {
                level: caps[1].len() as u8,
                text: caps[2].trim().to_string(),
            });
            index += 1;
            continue;
        }
        if RULE.is_match(line) {
            blocks.push(RawBlock::Rule);
            index += 1;
            continue;
        }
        if let Some(first) = quote_text(line) {
            let mut quote_lines = vec![first.to_string()];
            index += 1;
            while index < lines.len() {
                match quote_text(lines[index]) {
                    Some(rest) => {
                        quote_lines.push(rest.to_string());
                        index += 1;
                    }
                    None => break,
                }
            }
            blocks.push(RawBlock::Quote { lines: quote_lines });
            continue;
        }
        if let Some((list, consumed)) = try_list(&lines[index..]) {
            blocks.push(list);
            index += consumed;
            continue;
        }
        blocks.push(RawBlock::Paragraph {
            text: line.to_string(),
        });
        index += 1;
    }
    merge_adjacent_lists(blocks)
}

fn quote_text(line: &str) -> Option<&str> {
    line.strip_prefix(QUOTE_PREFIX)
}

/// Splits a `|`-bounded line into trimmed cells. Lines without both bounds
/// are not table material.
fn table_cells(line: &str) -> Option<Vec<String>> {
    if line.len() < 2 || !line.starts_with('|') || !line.ends_with('|') {
        return None;
    }
    let interior = &line[1..line.len() - 1];
    Some(interior.split('|').map(|cell| cell.trim().to_string()).collect())
}

/// A table candidate is a header line, a separator line whose cells all
/// match the dash pattern and whose count equals the header's, and zero or
/// more body lines. A bad separator rejects the whole candidate so a single
/// malformed row cannot eat surrounding text.
fn try_table(window: &[&str]) -> Option<(RawBlock, usize)> {
    if window.len() < 2 {
        return None;
    }
    let header = table_cells(window[0])?;
    let separator = table_cells(window[1])?;
    if separator.len() != header.len()
        || !separator.iter().all(|cell| SEPARATOR_CELL.is_match(cell))
    {
        return None;
    }
    let mut rows = Vec::new();
    let mut consumed = 2;
    while consumed < window.len() {
        match table_cells(window[consumed]) {
            Some(cells) => {
                rows.push(cells);
                consumed += 1;
            }
            None => break,
        }
    }
    Some((RawBlock::Table { header, rows }, consumed))
}

fn list_item(line: &str) -> Option<(bool, &str)> {
    if let Some(caps) = ORDERED_ITEM.captures(line) {
        return caps.get(1).map(|item| (true, item.as_str()));
    }
    if let Some(caps) = UNORDERED_ITEM.captures(line) {
        return caps.get(1).map(|item| (false, item.as_str()));
    }
    None
}

fn try_list(window: &[&str]) -> Option<(RawBlock, usize)> {
    let (ordered, first) = list_item(window[0])?;
    let mut items = vec![first.to_string()];
    let mut consumed = 1;
    while consumed < window.len() {
        match list_item(window[consumed]) {
            Some((kind, item)) if kind == ordered => {
                items.push(item.to_string());
                consumed += 1;
            }
            _ => break,
        }
    }
    Some((RawBlock::List { ordered, items }, consumed))
}

/// Same-kind lists separated only by dropped blank lines end up adjacent;
/// collapsing them guards against artifacts of line-by-line model output.
fn merge_adjacent_lists(blocks: Vec<RawBlock>) -> Vec<RawBlock> {
    let mut merged: Vec<RawBlock> = Vec::new();
    for block in blocks {
        match (merged.last_mut(), block) {
            (
                Some(RawBlock::List { ordered, items }),
                RawBlock::List {
                    ordered: next_ordered,
                    items: next_items,
                },
            ) if *ordered == next_ordered => {
                items.extend(next_items);
            }
            (_, block) => merged.push(block),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn valid_table_is_grouped() {
        let blocks = parse_blocks("|A|B|\n|-|-|\n|1|2|");
        assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            RawBlock::Table { header, rows } => {
                assert_eq!(header, &vec!["A".to_string(), "B".to_string()]);
                assert_eq!(rows, &vec![vec!["1".to_string(), "2".to_string()]]);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn invalid_separator_rejects_whole_candidate() {
        let blocks = parse_blocks("|A|B|\n|x|-|\n|1|2|");
        assert_eq!(blocks.len(), 3);
        assert!(blocks
            .iter()
            .all(|block| matches!(block, RawBlock::Paragraph { .. })));
    }

    #[test]
    fn separator_width_must_match_header() {
        let blocks = parse_blocks("|A|B|\n|-|\n");
        assert!(blocks
            .iter()
            .all(|block| matches!(block, RawBlock::Paragraph { .. })));
    }

    #[test]
    fn table_accepts_alignment_colons_and_no_body() {
        let blocks = parse_blocks("|A|B|\n|:-|-:|");
        match &blocks[0] {
            RawBlock::Table { rows, .. } => assert!(rows.is_empty()),
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn heading_levels_cap_at_six() {
        let blocks = parse_blocks("### Title\n####### seven");
        assert_eq!(
            blocks[0],
            RawBlock::Heading {
                level: 3,
                text: "Title".to_string()
            }
        );
        // seven hashes match no heading rule
        assert!(matches!(blocks[1], RawBlock::Paragraph { .. }));
    }

    #[test]
    fn bare_hashes_are_a_paragraph() {
        let blocks = parse_blocks("###");
        assert!(matches!(blocks[0], RawBlock::Paragraph { .. }));
    }

    #[test]
    fn rules_need_three_or_more() {
        assert_eq!(parse_blocks("---"), vec![RawBlock::Rule]);
        assert_eq!(parse_blocks("____"), vec![RawBlock::Rule]);
        assert!(matches!(
            parse_blocks("--")[0],
            RawBlock::Paragraph { .. }
        ));
    }

    #[test]
    fn consecutive_quote_lines_merge() {
        let blocks = parse_blocks("&gt; one\n&gt; two\nplain");
        assert_eq!(
            blocks[0],
            RawBlock::Quote {
                lines: vec!["one".to_string(), "two".to_string()]
            }
        );
        assert!(matches!(blocks[1], RawBlock::Paragraph { .. }));
    }

    #[test]
    fn mixed_bullet_markers_group_as_one_list() {
        let blocks = parse_blocks("- a\n* b\n+ c");
        assert_eq!(
            blocks[0],
            RawBlock::List {
                ordered: false,
                items: vec!["a".to_string(), "b".to_string(), "c".to_string()]
            }
        );
    }

    #[test]
    fn ordered_and_unordered_stay_separate() {
        let blocks = parse_blocks("- a\n1. b");
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn blank_separated_same_kind_lists_merge() {
        let blocks = parse_blocks(indoc! {"
            - a
            - b

            - c
        "});
        assert_eq!(
            blocks,
            vec![RawBlock::List {
                ordered: false,
                items: vec!["a".to_string(), "b".to_string(), "c".to_string()]
            }]
        );
    }

    #[test]
    fn blank_lines_are_dropped() {
        let blocks = parse_blocks("one\n\n\ntwo");
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn rule_is_not_a_bullet() {
        let blocks = parse_blocks("***\n* item");
        assert_eq!(blocks[0], RawBlock::Rule);
        assert!(matches!(blocks[1], RawBlock::List { .. }));
    }
}
