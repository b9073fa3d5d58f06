//! Line-oriented flashcard markup: `q:` opens a question, `a:` closes it.

use crate::processor::SAVE_CMD;

/// One completed question/answer pair, in the order its answer line closed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// Extracts the completed pairs from raw deck content.
///
/// A `q:`/`Q:` line opens a new question, silently discarding any
/// unterminated previous one. An `a:`/`A:` line is only accepted while a
/// question is open. Everything else is noise and skipped. The leading line
/// is dropped when it still carries the originating `/save` command.
pub fn parse(content: &str) -> Vec<QaPair> {
    let mut pairs = Vec::new();
    let mut open_question: Option<String> = None;

    for (i, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if i == 0 && line.starts_with(SAVE_CMD) {
            continue;
        }
        if let Some(rest) = strip_marker(line, 'q') {
            open_question = Some(rest.trim().to_owned());
        } else if let Some(rest) = strip_marker(line, 'a') {
            if let Some(question) = open_question.take() {
                pairs.push(QaPair {
                    question,
                    answer: rest.trim().to_owned(),
                });
            }
        }
    }

    pairs
}

// Case-insensitive on the marker letter only, `:` must follow immediately.
fn strip_marker(line: &str, marker: char) -> Option<&str> {
    line.strip_prefix(marker)
        .or_else(|| line.strip_prefix(marker.to_ascii_uppercase()))?
        .strip_prefix(':')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(question: &str, answer: &str) -> QaPair {
        QaPair {
            question: question.to_owned(),
            answer: answer.to_owned(),
        }
    }

    #[test]
    fn pairs_come_out_in_completion_order() {
        let content = "q: first?\na: one\nnoise line\nq: second?\na: two";
        assert_eq!(parse(content), vec![pair("first?", "one"), pair("second?", "two")]);
    }

    #[test]
    fn answer_without_open_question_is_dropped() {
        assert_eq!(parse("a:foo"), vec![]);
    }

    #[test]
    fn second_question_discards_unterminated_one() {
        assert_eq!(parse("q:A\nq:B\na:2"), vec![pair("B", "2")]);
    }

    #[test]
    fn markers_match_either_case() {
        let content = "Q: shouting?\nA: YES";
        assert_eq!(parse(content), vec![pair("shouting?", "YES")]);
    }

    #[test]
    fn leading_save_command_line_is_dropped() {
        let content = "/save\nq:x\na:y";
        assert_eq!(parse(content), vec![pair("x", "y")]);
        // only the first line is defensively stripped
        let content = "q:x\n/save\na:y";
        assert_eq!(parse(content), vec![pair("x", "y")]);
    }

    #[test]
    fn questions_and_answers_are_trimmed() {
        let content = "  q:   spaced out?   \n  a:   very   ";
        assert_eq!(parse(content), vec![pair("spaced out?", "very")]);
    }

    #[test]
    fn content_without_markers_yields_nothing() {
        assert_eq!(parse("just some prose\nover two lines"), vec![]);
        assert_eq!(parse(""), vec![]);
    }

    #[test]
    fn marker_needs_the_colon() {
        assert_eq!(parse("question one\nanswer one"), vec![]);
        assert_eq!(parse("q uestion\na nswer"), vec![]);
    }
}
