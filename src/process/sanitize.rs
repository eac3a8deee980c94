use once_cell::sync::Lazy;
use regex::Regex;

/// Anything that is not a Unicode word character or whitespace.
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid pattern"));

/// Minimum digits for a phone number to be kept.
pub const MIN_PHONE_DIGITS: usize = 7;

/// Drop punctuation and symbols, keeping letters, digits, `_` and
/// whitespace, then trim the ends.
pub fn sanitize_text(value: &str) -> String {
    NON_WORD.replace_all(value, "").trim().to_string()
}

/// Reduce a phone number to its digits. Fewer than [`MIN_PHONE_DIGITS`]
/// digits means there is no usable number. Only ASCII `0-9` count as digits.
pub fn sanitize_phone(value: &str) -> Option<String> {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    (digits.len() >= MIN_PHONE_DIGITS).then_some(digits)
}
