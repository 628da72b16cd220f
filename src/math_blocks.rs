//! Spacing fixes for `$$` display math and `$` inline math.
//!
//! Some editors happily render a `$$` block glued to the paragraph above it,
//! but most Markdown renderers need block elements surrounded by blank lines.
//! [`fix_math_blocks`] adds those blank lines while keeping blockquote
//! markers intact, cleans up inline math, and rounds list indentation up to
//! multiples of four.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

const INDENT_SIZE: usize = 4;

lazy_static! {
    static ref MATH_BLOCK: Regex = Regex::new(r"^([>\s]*)\$\$\s*$").unwrap();
    static ref DOLLAR_RUN: Regex = Regex::new(r"\${2,}").unwrap();
    static ref INLINE_PAIR: Regex = Regex::new(r"\$([^$]*)\$").unwrap();
    static ref FENCE: Regex = Regex::new(r"^[>\s]*(`{3,}|~{3,})").unwrap();
}

/// Returns the quote/whitespace prefix of a `$$` delimiter line, or `None`
/// if the line is not a delimiter.
///
/// ```
/// use docsage::math_blocks::math_block_prefix;
///
/// assert_eq!(math_block_prefix("> > $$"), Some("> > "));
/// assert_eq!(math_block_prefix("$$ x $$"), None);
/// ```
pub fn math_block_prefix(line: &str) -> Option<&str> {
    MATH_BLOCK
        .captures(line.trim_end())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

pub fn is_math_block(line: &str) -> bool {
    math_block_prefix(line).is_some()
}

pub fn is_inline_math(line: &str) -> bool {
    line.contains('$') && !is_math_block(line)
}

/// Collapses `$$ x $$` written inline into `$x$`.
///
/// Whitespace-only pairs such as `$ $` are kept as they are, otherwise a
/// second run would see a fresh `$$`.
pub fn fix_inline_math(line: &str) -> String {
    if !is_inline_math(line) {
        return line.to_string();
    }
    let collapsed = DOLLAR_RUN.replace_all(line, "$");
    INLINE_PAIR
        .replace_all(&collapsed, |caps: &Captures| {
            let inner = caps[1].trim();
            if inner.is_empty() {
                caps[0].to_string()
            } else {
                format!("${inner}$")
            }
        })
        .into_owned()
}

/// Rounds a run of leading spaces up to the next multiple of four. Tabs are
/// not counted.
pub fn fix_indent(line: &str) -> String {
    let rest = line.trim_start_matches(' ');
    let leading = line.len() - rest.len();
    if leading == 0 {
        return line.to_string();
    }
    let width = leading.div_ceil(INDENT_SIZE) * INDENT_SIZE;
    format!("{}{}", " ".repeat(width), rest)
}

fn is_separator(line: &str, prefix: &str) -> bool {
    line.trim() == prefix.trim()
}

fn separator_for(delimiter: &str, prefix: &str) -> String {
    if delimiter.ends_with('\r') {
        format!("{prefix}\r")
    } else {
        prefix.to_string()
    }
}

/// A fenced code block opener: the fence character and run length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    fn open(line: &str) -> Option<Self> {
        let run = FENCE.captures(line)?.get(1)?.as_str();
        Some(Self {
            marker: run.chars().next()?,
            len: run.len(),
        })
    }

    fn is_closed_by(&self, line: &str) -> bool {
        let run = line
            .trim_start_matches(|c: char| c == '>' || c.is_whitespace())
            .trim_end();
        run.len() >= self.len && run.chars().all(|c| c == self.marker)
    }
}

#[derive(Clone, Copy)]
enum State {
    Outside,
    InsideMath,
    InsideCode(Fence),
}

/// Fixes spacing around math in a whole document.
///
/// Never fails, and running it on its own output changes nothing.
pub fn fix_math_blocks(content: &str) -> String {
    let lines: Vec<&str> = content.split('\n').collect();
    let n = lines.len();
    let mut result: Vec<String> = Vec::with_capacity(n);
    let mut state = State::Outside;

    for (i, raw) in lines.iter().enumerate() {
        match state {
            State::Outside => {
                let line = fix_indent(raw);
                if let Some(fence) = Fence::open(&line) {
                    state = State::InsideCode(fence);
                    result.push(line);
                    continue;
                }

                let line = fix_inline_math(&line);
                if let Some(prefix) = math_block_prefix(&line) {
                    if matches!(result.last(), Some(last) if !is_separator(last, prefix)) {
                        result.push(separator_for(&line, prefix));
                    }
                    state = State::InsideMath;
                }
                result.push(line);
            }
            State::InsideMath => {
                let line = fix_indent(raw);
                if let Some(prefix) = math_block_prefix(&line) {
                    let separator = separator_for(&line, prefix);
                    // a trailing "" is just the final newline, not a line
                    let next = lines
                        .get(i + 1)
                        .filter(|next| !(i + 2 == n && next.is_empty()));
                    let pad = matches!(next, Some(next) if !is_separator(next, prefix));
                    result.push(line);
                    if pad {
                        result.push(separator);
                    }
                    state = State::Outside;
                } else {
                    result.push(line);
                }
            }
            State::InsideCode(fence) => {
                let line = fix_indent(raw);
                if fence.is_closed_by(&line) {
                    state = State::Outside;
                }
                result.push(line);
            }
        }
    }

    result.join("\n")
}
