use std::io::Write;

use color_print::cformat;
use eyre::Result;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::generate::Generation;
use super::history::{History, HistoryEntry};

pub const DEFAULT_WIDTH: usize = 80;
const MIN_COLUMN: usize = 20;
const GUTTER: &str = " │ ";

/// Terminal width, or [`DEFAULT_WIDTH`] when there is no terminal.
pub fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .ok()
        .filter(|cols| *cols > 0)
        .unwrap_or(DEFAULT_WIDTH)
}

pub fn banner(out: &mut dyn Write, today: &str) -> Result<()> {
    writeln!(out, "{}", cformat!("<bold>🤖 AI Assistant</>"))?;
    writeln!(out, "{}", cformat!("<dim>Casual and formal answers | <bold>Today:</> {}</>", today))?;
    writeln!(out)?;
    Ok(())
}

pub fn user_line(out: &mut dyn Write, user_id: &str) -> Result<()> {
    writeln!(out, "{}", cformat!("<bold>👤 User: {}</>", user_id))?;
    Ok(())
}

pub fn history_link(out: &mut dyn Write, url: &str) -> Result<()> {
    writeln!(out, "{}", cformat!("<cyan>📋 View Full History</>"))?;
    writeln!(out, "Copy this link to access your history later: {}", url)?;
    writeln!(out)?;
    Ok(())
}

pub fn error(out: &mut dyn Write, message: &str) -> Result<()> {
    writeln!(out, "{}", cformat!("<red>{}</>", message))?;
    Ok(())
}

pub fn notice(out: &mut dyn Write, message: &str) -> Result<()> {
    writeln!(out, "{}", cformat!("<yellow>{}</>", message))?;
    Ok(())
}

/// Both answers in two columns, then the elapsed time.
pub fn generation(out: &mut dyn Write, generation: &Generation, width: usize) -> Result<()> {
    two_columns(
        out,
        ("🎭 Casual Response", &generation.casual),
        ("📚 Formal Response", &generation.formal),
        width,
    )?;
    writeln!(
        out,
        "{}",
        cformat!("<green>Generated in {:.2}s</>", generation.elapsed.as_secs_f64())
    )?;
    Ok(())
}

/// Collapsed view: one numbered label per entry, newest first.
pub fn history_panel(out: &mut dyn Write, history: &History) -> Result<()> {
    writeln!(out, "{}", cformat!("<bold>🕑 Conversation History</>"))?;
    if history.is_empty() {
        writeln!(out, "No history yet. Your conversations will appear here.")?;
        return Ok(());
    }
    for (idx, entry) in history.entries().iter().enumerate() {
        writeln!(out, "  {:>2}. ▸ {}  {}", idx + 1, entry.label(), cformat!("<dim>{}</>", entry.time))?;
    }
    writeln!(out, "{}", cformat!("<dim>Use /history N to expand entry N.</>"))?;
    Ok(())
}

/// Expanded view of a single entry.
pub fn history_entry(out: &mut dyn Write, number: usize, entry: &HistoryEntry, width: usize) -> Result<()> {
    writeln!(out, "  {:>2}. ▾ {}", number, entry.label())?;
    writeln!(out, "{}", cformat!("<dim>{}</>", entry.time))?;
    writeln!(out, "{} {}", cformat!("<bold>Query:</>"), entry.query)?;
    writeln!(out, "{}", "─".repeat(width.min(DEFAULT_WIDTH)))?;
    writeln!(out, "{}", cformat!("<bold>🎭 Casual</>"))?;
    writeln!(out, "{}", entry.casual)?;
    writeln!(out)?;
    writeln!(out, "{}", cformat!("<bold>📚 Formal</>"))?;
    writeln!(out, "{}", entry.formal)?;
    Ok(())
}

fn two_columns(out: &mut dyn Write, left: (&str, &str), right: (&str, &str), width: usize) -> Result<()> {
    let column = width.saturating_sub(GUTTER.width()) / 2;
    if column < MIN_COLUMN {
        // Too narrow to sit side by side.
        for (title, body) in [left, right] {
            writeln!(out, "{}", title)?;
            writeln!(out, "{}", body)?;
            writeln!(out)?;
        }
        return Ok(());
    }

    let mut left_lines = vec![left.0.to_string(), String::new()];
    left_lines.extend(wrap(left.1, column));
    let mut right_lines = vec![right.0.to_string(), String::new()];
    right_lines.extend(wrap(right.1, column));

    let rows = left_lines.len().max(right_lines.len());
    for row in 0..rows {
        let l = left_lines.get(row).map(String::as_str).unwrap_or("");
        let r = right_lines.get(row).map(String::as_str).unwrap_or("");
        writeln!(out, "{}{}{}", pad(l, column), GUTTER, r)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Greedy wrap to `width` terminal columns. Breaks only at whitespace, and
/// keeps indentation and runs of spaces inside a line. Words wider than a
/// line are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut gap = "";
        for token in whitespace_runs(paragraph) {
            if token.starts_with(char::is_whitespace) {
                gap = token;
                continue;
            }
            if line.width() + gap.width() + token.width() <= width {
                line.push_str(gap);
                line.push_str(token);
            } else {
                // The break swallows the whitespace before the word
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                let mut rest = token;
                while rest.width() > width {
                    let (head, tail) = split_at_column(rest, width);
                    lines.push(head.to_string());
                    rest = tail;
                }
                line.push_str(rest);
            }
            gap = "";
        }
        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Splits `text` into alternating runs of whitespace and non-whitespace.
fn whitespace_runs(text: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (idx, c) in text.char_indices() {
        let space = c.is_whitespace();
        if matches!(in_space, Some(prev) if prev != space) {
            runs.push(&text[start..idx]);
            start = idx;
        }
        in_space = Some(space);
    }
    if start < text.len() {
        runs.push(&text[start..]);
    }
    runs
}

/// Longest prefix that fits in `columns`, but always at least one character.
fn split_at_column(text: &str, columns: usize) -> (&str, &str) {
    let mut used = 0;
    for (idx, c) in text.char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > columns && idx > 0 {
            return text.split_at(idx);
        }
        used += w;
    }
    (text, "")
}

fn pad(text: &str, width: usize) -> String {
    let len = text.width();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn rendered(f: impl FnOnce(&mut dyn Write) -> Result<()>) -> String {
        let mut buf: Vec<u8> = Vec::new();
        let out: &mut dyn Write = &mut buf;
        f(out).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap("the quick brown fox jumps over the lazy dog", 10);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = wrap("abcdefghijkl", 5);
        assert_eq!(lines, vec!["abcde", "fghij", "kl"]);
    }

    #[test]
    fn test_wrap_keeps_paragraph_breaks() {
        let lines = wrap("one\n\ntwo", 20);
        assert_eq!(lines, vec!["one", "", "two"]);
    }

    #[test]
    fn test_wrap_keeps_indentation_and_inner_spaces() {
        let lines = wrap("def f():\n    return 1\nx  =  2", 38);
        assert_eq!(lines, vec!["def f():", "    return 1", "x  =  2"]);
    }

    #[test]
    fn test_wrap_breaks_only_at_whitespace() {
        let lines = wrap("  alpha beta gamma", 12);
        assert_eq!(lines, vec!["  alpha beta", "gamma"]);
    }

    #[test]
    fn test_wrap_measures_wide_characters_in_columns() {
        let lines = wrap("日本語テキスト", 6);
        assert!(lines.iter().all(|l| l.width() <= 6));
        assert_eq!(lines.concat(), "日本語テキスト");
    }

    #[test]
    fn test_indented_code_survives_side_by_side_view() {
        let generation = Generation {
            casual: "def f():\n    return 1".to_string(),
            formal: "Formally:".to_string(),
            elapsed: Duration::from_secs(1),
        };
        let text = rendered(|out| super::generation(out, &generation, 80));
        assert!(text.lines().any(|l| l.starts_with("    return 1")));
    }

    #[test]
    fn test_gutter_lines_up_on_every_row() {
        let generation = Generation {
            casual: "short".to_string(),
            formal: "also short".to_string(),
            elapsed: Duration::from_secs(1),
        };
        let text = rendered(|out| super::generation(out, &generation, 80));

        let columns: Vec<usize> = text
            .lines()
            .filter_map(|l| l.find('│').map(|idx| l[..idx].width()))
            .collect();
        assert!(columns.len() >= 3);
        assert!(columns.iter().all(|c| *c == columns[0]));
    }

    #[test]
    fn test_generation_shows_both_columns_and_time() {
        let generation = Generation {
            casual: "hey there".to_string(),
            formal: "Good day".to_string(),
            elapsed: Duration::from_millis(1234),
        };
        let text = rendered(|out| super::generation(out, &generation, 80));

        let row = text.lines().find(|l| l.contains("hey there")).unwrap();
        assert!(row.contains("Good day"));
        assert!(text.contains("Casual Response"));
        assert!(text.contains("Formal Response"));
        assert!(text.contains("Generated in 1.23s"));
    }

    #[test]
    fn test_narrow_terminal_stacks_columns() {
        let generation = Generation {
            casual: "hey there".to_string(),
            formal: "Good day".to_string(),
            elapsed: Duration::from_secs(1),
        };
        let text = rendered(|out| super::generation(out, &generation, 30));
        assert!(!text.lines().any(|l| l.contains("hey there") && l.contains("Good day")));
    }

    #[test]
    fn test_empty_history_panel() {
        let text = rendered(|out| history_panel(out, &History::new()));
        assert!(text.contains("No history yet. Your conversations will appear here."));
    }

    #[test]
    fn test_history_panel_lists_newest_first() {
        let mut history = History::new();
        history.record(HistoryEntry::new("first question", "c1", "f1"));
        history.record(HistoryEntry::new("second question", "c2", "f2"));
        let text = rendered(|out| history_panel(out, &history));

        let second = text.find("second question...").unwrap();
        let first = text.find("first question...").unwrap();
        assert!(second < first);
        assert!(!text.contains("c1"));
    }

    #[test]
    fn test_expanded_entry_shows_everything() {
        let query = "a question that is definitely longer than thirty characters";
        let entry = HistoryEntry::new(query, "casual text", "formal text");
        let text = rendered(|out| history_entry(out, 1, &entry, 80));

        assert!(text.contains(query));
        assert!(text.contains("casual text"));
        assert!(text.contains("formal text"));
        assert!(text.contains(&entry.time));
    }

    #[test]
    fn test_history_link_prints_literal_url() {
        let url = "http://localhost:8000/history?user_id=alice";
        let text = rendered(|out| history_link(out, url));
        assert!(text.contains("View Full History"));
        assert!(text.contains(url));
    }
}
