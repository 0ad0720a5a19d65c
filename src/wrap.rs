//! Greedy word wrapping against a fixed width.

use crate::metrics::TextMetrics;
use crate::style::FontSpec;

/// Slack for floating point comparisons, in millimetres.
const WIDTH_EPSILON: f64 = 1e-9;

/// Splits `text` into lines no wider than `width` millimetres.
///
/// Lines break at the last whitespace that keeps them within the width.
/// Explicit newlines always start a new line, a word that is wider than the
/// whole line is broken between characters, and an empty paragraph still
/// yields one (empty) line.
pub fn wrap_text(metrics: &dyn TextMetrics, text: &str, font: &FontSpec, width: f64) -> Vec<String> {
    let fits = |candidate: &str| {
        metrics.text_width(candidate, font.weight, font.size_pt) <= width + WIDTH_EPSILON
    };

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
        let mut line = String::new();

        for word in paragraph.split_whitespace() {
            if line.is_empty() {
                if fits(word) {
                    line.push_str(word);
                } else {
                    line = break_word(word, &fits, &mut lines);
                }
                continue;
            }

            let candidate = format!("{line} {word}");
            if fits(&candidate) {
                line = candidate;
            } else if fits(word) {
                lines.push(std::mem::replace(&mut line, word.to_owned()));
            } else {
                lines.push(std::mem::take(&mut line));
                line = break_word(word, &fits, &mut lines);
            }
        }

        lines.push(line);
    }
    lines
}

/// Emits all full-width chunks of `word` into `lines` and returns the remainder.
fn break_word(word: &str, fits: &dyn Fn(&str) -> bool, lines: &mut Vec<String>) -> String {
    let mut chunk = String::new();
    for c in word.chars() {
        chunk.push(c);
        if !fits(&chunk) && chunk.chars().count() > 1 {
            chunk.pop();
            lines.push(std::mem::take(&mut chunk));
            chunk.push(c);
        }
    }
    chunk
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Helvetica;
    use crate::style::FontWeight;

    fn body() -> FontSpec {
        FontSpec::regular(12.0, 1.2)
    }

    #[test]
    fn short_text_stays_on_one_line() {
        let lines = wrap_text(&Helvetica, "Short", &body(), 100.0);
        assert_eq!(lines, vec!["Short"]);
    }

    #[test]
    fn empty_text_occupies_one_line() {
        assert_eq!(wrap_text(&Helvetica, "", &body(), 100.0), vec![""]);
    }

    #[test]
    fn lines_respect_the_width() {
        let text = "We have vertical integration between our IT and Operational Technology \
                    systems, enabling seamless data flow across all levels of the plant.";
        let width = 60.0;
        let lines = wrap_text(&Helvetica, text, &body(), width);

        assert!(lines.len() > 1);
        for line in &lines {
            let measured = Helvetica.text_width(line, FontWeight::Regular, 12.0);
            assert!(measured <= width + WIDTH_EPSILON, "`{line}` is {measured}mm wide");
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn breaks_at_the_last_fitting_space() {
        let width = Helvetica.text_width("alpha beta", FontWeight::Regular, 12.0);
        let lines = wrap_text(&Helvetica, "alpha beta gamma", &body(), width);
        assert_eq!(lines, vec!["alpha beta", "gamma"]);
    }

    #[test]
    fn newlines_start_new_lines() {
        let lines = wrap_text(&Helvetica, "one\ntwo\r\n\nfour", &body(), 100.0);
        assert_eq!(lines, vec!["one", "two", "", "four"]);
    }

    #[test]
    fn oversized_words_are_split_between_characters() {
        let width = Helvetica.text_width("abcd", FontWeight::Regular, 12.0);
        let lines = wrap_text(&Helvetica, "xy abcdefghij", &body(), width);

        assert_eq!(lines[0], "xy");
        assert_eq!(lines.concat(), "xyabcdefghij");
        for line in &lines {
            assert!(Helvetica.text_width(line, FontWeight::Regular, 12.0) <= width + WIDTH_EPSILON);
        }
    }
}
