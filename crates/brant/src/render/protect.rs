use lazy_static::lazy_static;
use regex::Regex;

use crate::render::escape;

/// Sentinel pairs for placeholder tokens. Private-use characters, scrubbed
/// from raw input before extraction, so a token can never collide with user
/// text. Fence and inline tokens use disjoint pairs.
pub const FENCE_OPEN: char = '\u{E000}';
pub const FENCE_CLOSE: char = '\u{E001}';
pub const INLINE_OPEN: char = '\u{E002}';
pub const INLINE_CLOSE: char = '\u{E003}';

lazy_static! {
    static ref INLINE_CODE: Regex = Regex::new("`([^`\n]+)`").unwrap();
}

/// A protected fenced code block. The code is the fence interior after a
/// single outer trim, whitespace otherwise untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct FenceEntry {
    pub language: Option<String>,
    pub code: String,
}

/// Spans extracted by one protection pass, indexed by token number. Owned by
/// a single parse invocation; concurrent messages each get their own arena.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CodeArena {
    fences: Vec<FenceEntry>,
    inline_spans: Vec<String>,
}

impl CodeArena {
    pub fn fence(&self, index: usize) -> Option<&FenceEntry> {
        self.fences.get(index)
    }

    pub fn inline_span(&self, index: usize) -> Option<&str> {
        self.inline_spans.get(index).map(String::as_str)
    }

    fn push_fence(&mut self, entry: FenceEntry) -> usize {
        self.fences.push(entry);
        self.fences.len() - 1
    }

    fn push_inline_span(&mut self, code: String) -> usize {
        self.inline_spans.push(code);
        self.inline_spans.len() - 1
    }
}

pub fn fence_token(index: usize) -> String {
    format!("{FENCE_OPEN}{index}{FENCE_CLOSE}")
}

pub fn inline_token(index: usize) -> String {
    format!("{INLINE_OPEN}{index}{INLINE_CLOSE}")
}

/// Extracts fenced and inline code into the returned arena, replaces each
/// span with a numbered token, and HTML-escapes everything that remains.
/// Escaping runs only on the remainder: earlier would corrupt the fence
/// delimiters, later would double-escape restored code.
pub fn protect(raw: &str) -> (String, CodeArena) {
    let mut arena = CodeArena::default();
    let cleaned = scrub_sentinels(&normalize_newlines(raw));
    let without_fences = extract_fences(&cleaned, &mut arena);
    let tokenized = extract_inline_spans(&without_fences, &mut arena);
    (escape::escape_html(&tokenized), arena)
}

fn normalize_newlines(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n")
}

fn scrub_sentinels(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !matches!(*ch, FENCE_OPEN | FENCE_CLOSE | INLINE_OPEN | INLINE_CLOSE))
        .collect()
}

enum FenceScan {
    Outside,
    Inside {
        opening: String,
        language: Option<String>,
        lines: Vec<String>,
    },
}

/// Line-oriented fence extraction. An unterminated fence is not a code
/// block: its lines are put back as ordinary text, so a still-streaming
/// response never shows a bogus block.
fn extract_fences(text: &str, arena: &mut CodeArena) -> String {
    let mut out_lines: Vec<String> = Vec::new();
    let mut state = FenceScan::Outside;
    for line in text.split('\n') {
        state = match state {
            FenceScan::Outside => match line.trim_start().strip_prefix("```") {
                Some(info) => FenceScan::Inside {
                    opening: line.to_string(),
                    language: info.split_whitespace().next().map(str::to_string),
                    lines: Vec::new(),
                },
                None => {
                    out_lines.push(line.to_string());
                    FenceScan::Outside
                }
            },
            FenceScan::Inside {
                opening,
                language,
                mut lines,
            } => {
                if line.trim() == "```" {
                    let code = lines.join("\n").trim().to_string();
                    let index = arena.push_fence(FenceEntry { language, code });
                    out_lines.push(fence_token(index));
                    FenceScan::Outside
                } else {
                    lines.push(line.to_string());
                    FenceScan::Inside {
                        opening,
                        language,
                        lines,
                    }
                }
            }
        };
    }
    if let FenceScan::Inside { opening, lines, .. } = state {
        out_lines.push(opening);
        out_lines.extend(lines);
    }
    out_lines.join("\n")
}

fn extract_inline_spans(text: &str, arena: &mut CodeArena) -> String {
    INLINE_CODE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            inline_token(arena.push_inline_span(caps[1].trim().to_string()))
        })
        .into_owned()
}
