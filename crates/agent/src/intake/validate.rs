//! Field validators for the ticket flow
//!
//! Each validator returns the normalized value or the corrective message to
//! send back to the user.

use once_cell::sync::Lazy;
use regex::Regex;

use super::messages;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$").unwrap());

/// Misspelled popular domains and their corrections
const DOMAIN_TYPOS: &[(&str, &str)] = &[
    ("gmial.com", "gmail.com"),
    ("gmai.com", "gmail.com"),
    ("gnail.com", "gmail.com"),
    ("yahooo.com", "yahoo.com"),
    ("yaho.com", "yahoo.com"),
    ("hotmial.com", "hotmail.com"),
    ("outlok.com", "outlook.com"),
];

/// Whole-input "I have no customer number" replies
const NO_NUMBER_EXACT: &[&str] = &["n/a", "na", "none", "no", "لا"];

/// Phrases meaning the same anywhere in the reply
const NO_NUMBER_PHRASES: &[&str] = &["don't have", "dont have", "not applicable", "لا يوجد", "ليس لدي"];

const CONFIRMATIONS: &[&str] = &["yes", "y", "yeah", "yep", "نعم"];

const MIN_PROBLEM_CHARS: usize = 10;
const MIN_PROBLEM_WORDS: usize = 3;
const SYMBOL_RUN_LIMIT: usize = 10;

pub(crate) fn validate_name(input: &str) -> Result<String, &'static str> {
    let name = input.trim();
    if name.chars().count() < 2 {
        return Err(messages::NAME_TOO_SHORT);
    }
    if name.chars().any(char::is_numeric) {
        return Err(messages::NAME_HAS_DIGITS);
    }
    if !name
        .chars()
        .all(|c| c.is_alphabetic() || c.is_whitespace() || matches!(c, '-' | '\'' | '.'))
    {
        return Err(messages::NAME_INVALID_CHARS);
    }

    let parts: Vec<&str> = name.split_whitespace().collect();
    if parts.len() < 2 {
        return Err(messages::NAME_NOT_FULL);
    }
    if parts.iter().any(|p| p.chars().count() < 2) {
        return Err(messages::NAME_PART_TOO_SHORT);
    }

    Ok(parts.iter().map(|p| title_case(p)).collect::<Vec<_>>().join(" "))
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EmailCheck {
    Valid(String),
    /// Well-formed but on a known misspelled domain
    Typo { suggestion: String },
    Invalid(&'static str),
}

pub(crate) fn validate_email(input: &str) -> EmailCheck {
    let email = input.trim().to_lowercase();
    if !email.contains('@') || !email.contains('.') {
        return EmailCheck::Invalid(messages::EMAIL_MISSING_PARTS);
    }
    if !EMAIL_PATTERN.is_match(&email) {
        return EmailCheck::Invalid(messages::EMAIL_INVALID);
    }

    let Some((local, domain)) = email.split_once('@') else {
        return EmailCheck::Invalid(messages::EMAIL_INVALID);
    };
    if let Some((_, fixed)) = DOMAIN_TYPOS.iter().find(|(typo, _)| *typo == domain) {
        return EmailCheck::Typo {
            suggestion: format!("{}@{}", local, fixed),
        };
    }
    if domain.split('.').any(str::is_empty) {
        return EmailCheck::Invalid(messages::EMAIL_INVALID);
    }

    EmailCheck::Valid(email)
}

/// `Ok(None)` when the user has no customer number
pub(crate) fn validate_customer_number(input: &str) -> Result<Option<String>, &'static str> {
    let lower = input.trim().to_lowercase();
    if NO_NUMBER_EXACT.contains(&lower.as_str())
        || NO_NUMBER_PHRASES.iter().any(|p| lower.contains(p))
    {
        return Ok(None);
    }

    let clean: String = input
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    if clean.is_empty() || !clean.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(messages::NUMBER_NOT_ALNUM);
    }
    if clean.len() < 3 {
        return Err(messages::NUMBER_TOO_SHORT);
    }
    if clean.len() > 20 {
        return Err(messages::NUMBER_TOO_LONG);
    }

    Ok(Some(clean.to_uppercase()))
}

pub(crate) fn validate_problem(input: &str) -> Result<String, &'static str> {
    let problem = input.trim();
    if problem.chars().count() < MIN_PROBLEM_CHARS {
        return Err(messages::PROBLEM_TOO_SHORT);
    }
    if is_single_repeated_char(problem) || longest_symbol_run(problem) >= SYMBOL_RUN_LIMIT {
        return Err(messages::PROBLEM_MEANINGLESS);
    }
    if problem.split_whitespace().count() < MIN_PROBLEM_WORDS {
        return Err(messages::PROBLEM_TOO_FEW_WORDS);
    }
    Ok(problem.to_string())
}

fn is_single_repeated_char(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => false,
    }
}

/// Longest stretch of characters that are neither alphanumeric nor whitespace
fn longest_symbol_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c.is_alphanumeric() || c.is_whitespace() {
            current = 0;
        } else {
            current += 1;
            longest = longest.max(current);
        }
    }
    longest
}

/// Reply accepting a suggested correction
pub(crate) fn is_confirmation(input: &str) -> bool {
    let reply = input
        .trim()
        .trim_end_matches(|c: char| matches!(c, '!' | '.' | '؟' | '?'))
        .to_lowercase();
    CONFIRMATIONS.contains(&reply.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_rules() {
        assert_eq!(validate_name("Jo"), Err(messages::NAME_NOT_FULL));
        assert_eq!(validate_name("J"), Err(messages::NAME_TOO_SHORT));
        assert_eq!(validate_name("John Smith2"), Err(messages::NAME_HAS_DIGITS));
        assert_eq!(validate_name("John_Smith"), Err(messages::NAME_INVALID_CHARS));
        assert_eq!(validate_name("John S"), Err(messages::NAME_PART_TOO_SHORT));
    }

    #[test]
    fn test_name_is_title_cased() {
        assert_eq!(validate_name("  jANE   o'neil-smith ").unwrap(), "Jane O'neil-smith");
        assert_eq!(validate_name("mary ann st. clair").unwrap(), "Mary Ann St. Clair");
    }

    #[test]
    fn test_arabic_name_accepted() {
        assert_eq!(validate_name("محمد العلي").unwrap(), "محمد العلي");
        assert_eq!(validate_name("محمد ٣"), Err(messages::NAME_HAS_DIGITS));
    }

    #[test]
    fn test_email_rules() {
        assert_eq!(validate_email("john"), EmailCheck::Invalid(messages::EMAIL_MISSING_PARTS));
        assert_eq!(validate_email("john@example"), EmailCheck::Invalid(messages::EMAIL_MISSING_PARTS));
        assert_eq!(validate_email("john@exa mple.com"), EmailCheck::Invalid(messages::EMAIL_INVALID));
        assert_eq!(validate_email("john@example.c"), EmailCheck::Invalid(messages::EMAIL_INVALID));
        assert_eq!(validate_email("john@example..com"), EmailCheck::Invalid(messages::EMAIL_INVALID));
        assert_eq!(
            validate_email("  John.Smith+tag@Example.co.uk "),
            EmailCheck::Valid("john.smith+tag@example.co.uk".into())
        );
    }

    #[test]
    fn test_email_typo_suggestion() {
        assert_eq!(
            validate_email("john@gmial.com"),
            EmailCheck::Typo {
                suggestion: "john@gmail.com".into()
            }
        );
        assert_eq!(
            validate_email("ANN@Outlok.com"),
            EmailCheck::Typo {
                suggestion: "ann@outlook.com".into()
            }
        );
    }

    #[test]
    fn test_customer_number_rules() {
        assert_eq!(validate_customer_number("N/A"), Ok(None));
        assert_eq!(validate_customer_number(" none "), Ok(None));
        assert_eq!(validate_customer_number("I don't have one"), Ok(None));
        assert_eq!(validate_customer_number("لا يوجد"), Ok(None));
        assert_eq!(validate_customer_number("ab-12 34"), Ok(Some("AB1234".into())));
        // "no" only counts as the whole reply
        assert_eq!(validate_customer_number("NO-4521"), Ok(Some("NO4521".into())));
        assert_eq!(validate_customer_number("12"), Err(messages::NUMBER_TOO_SHORT));
        assert_eq!(validate_customer_number("#1234"), Err(messages::NUMBER_NOT_ALNUM));
        assert_eq!(
            validate_customer_number("123456789012345678901"),
            Err(messages::NUMBER_TOO_LONG)
        );
    }

    #[test]
    fn test_problem_rules() {
        assert_eq!(validate_problem("broken"), Err(messages::PROBLEM_TOO_SHORT));
        assert_eq!(validate_problem("aaaaaaaaaaaa"), Err(messages::PROBLEM_MEANINGLESS));
        assert_eq!(validate_problem("!!!!!!!!!!!!"), Err(messages::PROBLEM_MEANINGLESS));
        assert_eq!(validate_problem("help ?!?!?!?!?!?! now"), Err(messages::PROBLEM_MEANINGLESS));
        assert_eq!(validate_problem("checkout broken"), Err(messages::PROBLEM_TOO_FEW_WORDS));
        assert_eq!(
            validate_problem("  I cannot log into my account  ").unwrap(),
            "I cannot log into my account"
        );
    }

    #[test]
    fn test_confirmation_replies() {
        assert!(is_confirmation("Yes!"));
        assert!(is_confirmation(" y "));
        assert!(is_confirmation("نعم"));
        assert!(!is_confirmation("yes but no"));
        assert!(!is_confirmation("john@gmail.com"));
    }
}
