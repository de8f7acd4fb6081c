//! Parsing of instrument replies.

/// Parse a scalar reply into a number.
///
/// The instrument answers probe reads either with a bare number or with a
/// labeled string of the form `t1: 23.25 C`. The label up to the last colon
/// and a trailing single-letter unit token are stripped, case-insensitively,
/// before conversion. Anything that does not leave exactly one convertible
/// number is rejected.
pub fn parse_labeled_scalar(response: &str) -> Option<f64> {
    let value = match response.rsplit_once(':') {
        Some((_, rest)) => rest,
        None => response,
    };

    let mut tokens: Vec<&str> = value.split_whitespace().collect();
    if tokens.len() > 1
        && tokens
            .last()
            .is_some_and(|t| t.len() == 1 && t.chars().all(|c| c.is_ascii_alphabetic()))
    {
        tokens.pop();
    }

    if tokens.len() != 1 {
        return None;
    }
    tokens[0].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_reply() {
        assert_eq!(parse_labeled_scalar("t: 23.25 C"), Some(23.25));
    }

    #[test]
    fn test_bare_number() {
        assert_eq!(parse_labeled_scalar("23.25"), Some(23.25));
    }

    #[test]
    fn test_unit_letter_case_insensitive() {
        assert_eq!(parse_labeled_scalar("t1: 21.72 c"), Some(21.72));
        assert_eq!(parse_labeled_scalar("t2: -4.50 F"), Some(-4.5));
    }

    #[test]
    fn test_bare_number_with_unit() {
        assert_eq!(parse_labeled_scalar("23.25 C"), Some(23.25));
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert_eq!(parse_labeled_scalar("t: abc C"), None);
    }

    #[test]
    fn test_rejects_empty_and_multi_value() {
        assert_eq!(parse_labeled_scalar(""), None);
        assert_eq!(parse_labeled_scalar("t:"), None);
        assert_eq!(parse_labeled_scalar("t: 1.0 2.0 C"), None);
    }
}
