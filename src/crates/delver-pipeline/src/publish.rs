//! Console output formatting
//!
//! Framed, colored banners for run milestones and 80-column word wrapping
//! for the published answer. Formatting is separated from printing so the
//! wrap logic is testable.

/// Default wrap width for published answers.
pub const WRAP_WIDTH: usize = 80;

/// ANSI color code for the original query banner.
pub const COLOR_QUERY: &str = "95";
/// ANSI color code for sub-query banners.
pub const COLOR_SUBQUERY: &str = "92";
/// ANSI color code for the answer banner.
pub const COLOR_ANSWER: &str = "96";

/// Render a three-line framed banner with a centered, colored label.
pub fn banner(label: &str, color: &str) -> String {
    let bar = "=".repeat(WRAP_WIDTH);
    let spaced = format!(" {label} ");
    let fill = WRAP_WIDTH.saturating_sub(spaced.chars().count());
    let left = fill / 2;
    let right = fill - left;
    format!(
        "{bar}\n\x1b[{color}m{}{spaced}{}\x1b[0m\n{bar}",
        "=".repeat(left),
        "=".repeat(right),
    )
}

/// Print a banner, followed by `text` if non-empty.
pub fn print_banner(text: &str, label: &str, color: &str) {
    println!("{}", banner(label, color));
    if !text.is_empty() {
        println!("\n{text}\n");
    }
}

/// Word-wrap `text` to `max_width` columns.
///
/// Lines break at the last space before the limit, or mid-word when a single
/// word exceeds the width; a trailing partial line is kept.
pub fn wrap(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut rest = chars.as_slice();
    let mut lines = Vec::new();

    while rest.len() >= max_width {
        let window = &rest[..max_width];
        let break_idx = window
            .iter()
            .rposition(|c| *c == ' ')
            .unwrap_or(max_width);
        let line: String = rest[..break_idx].iter().collect();
        lines.push(line.trim_end().to_string());
        rest = &rest[break_idx..];
        while rest.first() == Some(&' ') {
            rest = &rest[1..];
        }
    }

    let tail: String = rest.iter().collect();
    if !tail.trim().is_empty() {
        lines.push(tail.trim().to_string());
    }
    lines.join("\n")
}

/// Print the published answer under its banner, wrapped.
pub fn print_response(response: &str) {
    print_banner("", "AI Response", COLOR_ANSWER);
    println!("{}\n", wrap(response, WRAP_WIDTH));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_untouched() {
        assert_eq!(wrap("short answer", 80), "short answer");
    }

    #[test]
    fn test_wraps_at_word_boundary() {
        let text = "aaa bbb ccc ddd";
        let wrapped = wrap(text, 8);
        assert_eq!(wrapped, "aaa bbb\nccc ddd");
    }

    #[test]
    fn test_breaks_long_word_mid_word() {
        let wrapped = wrap("abcdefghij", 4);
        assert_eq!(wrapped, "abcd\nefgh\nij");
    }

    #[test]
    fn test_no_line_exceeds_width() {
        let text = "the quick brown fox jumps over the lazy dog ".repeat(10);
        for line in wrap(&text, 80).lines() {
            assert!(line.chars().count() <= 80, "line too long: {line:?}");
        }
    }

    #[test]
    fn test_banner_is_three_framed_lines() {
        let banner = banner("AI Response", COLOR_ANSWER);
        let lines: Vec<&str> = banner.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "=".repeat(80));
        assert_eq!(lines[2], "=".repeat(80));
        assert!(lines[1].contains(" AI Response "));
        assert!(lines[1].starts_with("\x1b[96m"));
    }
}
