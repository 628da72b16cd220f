use std::fmt::{self, Write};

use console::Style;
use similar::{ChangeTag, TextDiff};

struct Line(Option<usize>);

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            None => write!(f, "    "),
            Some(idx) => write!(f, "{:<4}", idx + 1),
        }
    }
}

/// Renders a colored line diff with three lines of context around each
/// change. Changed words inside a line are underlined.
#[must_use]
pub fn diff(old: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut out = String::new();

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            let _ = writeln!(out, "{:-^1$}", "-", 80);
        }
        for op in group {
            for change in diff.iter_inline_changes(op) {
                let (sign, s) = match change.tag() {
                    ChangeTag::Delete => ("-", Style::new().red()),
                    ChangeTag::Insert => ("+", Style::new().green()),
                    ChangeTag::Equal => (" ", Style::new().dim()),
                };
                let _ = write!(
                    out,
                    "{}{} |{}",
                    s.apply_to(Line(change.old_index())).dim(),
                    s.apply_to(Line(change.new_index())).dim(),
                    s.apply_to(sign).bold(),
                );
                for (emphasized, value) in change.iter_strings_lossy() {
                    if emphasized {
                        let _ = write!(out, "{}", s.apply_to(value).underlined().on_black());
                    } else {
                        let _ = write!(out, "{}", s.apply_to(value));
                    }
                }
                if change.missing_newline() {
                    out.push('\n');
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_text_has_no_diff() {
        assert_eq!("", diff("a\nb\n", "a\nb\n"));
    }

    #[test]
    fn shows_inserted_separator() {
        console::set_colors_enabled(false);
        let rendered = diff("text\n$$\nx\n$$\n", "text\n\n$$\nx\n$$\n");
        assert!(rendered.contains("|+"), "{rendered}");
        assert!(rendered.contains("| $$"), "{rendered}");
    }
}
