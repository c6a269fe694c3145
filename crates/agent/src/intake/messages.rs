//! Prompts and corrective messages of the ticket flow

pub(crate) const START: &str =
    "Let me collect some information to create your support ticket.\n\nFirst, may I have your full name?";

pub(crate) const CANCELLED: &str = "Support ticket submission cancelled. How else can I help you?";

// name
pub(crate) const NAME_TOO_SHORT: &str = "Please provide your full name (at least 2 characters).";
pub(crate) const NAME_HAS_DIGITS: &str = "Please provide a valid name without numbers.";
pub(crate) const NAME_INVALID_CHARS: &str = "Please provide a valid name using only letters.";
pub(crate) const NAME_NOT_FULL: &str =
    "Please provide your full name (first and last name). For example: John Smith";
pub(crate) const NAME_PART_TOO_SHORT: &str =
    "Please provide a complete name. Each part should be at least 2 letters.";

// email
pub(crate) const EMAIL_MISSING_PARTS: &str = "That doesn't look like a valid email address. Please include '@' and a domain (e.g., name@example.com).";
pub(crate) const EMAIL_INVALID: &str =
    "Please provide a valid email address. Example: john.smith@example.com";
pub(crate) const EMAIL_ACCEPTED: &str =
    "Great! What's your customer number? (If you don't have one, just type 'N/A' or 'None')";

// customer number
pub(crate) const NUMBER_NOT_ALNUM: &str = "Customer numbers should only contain letters and numbers. Please provide a valid customer number or type 'N/A' if you don't have one.";
pub(crate) const NUMBER_TOO_SHORT: &str = "That customer number seems too short. Please check and try again, or type 'N/A' if you don't have one.";
pub(crate) const NUMBER_TOO_LONG: &str = "That customer number seems too long. Please check and try again, or type 'N/A' if you don't have one.";
pub(crate) const NO_NUMBER_ACCEPTED: &str = "No problem! Now, please describe your issue in detail. The more information you provide, the better we can help you.";
pub(crate) const NUMBER_ACCEPTED: &str = "Perfect! Now, please describe your problem in detail. The more information you provide, the better we can help you.";

// problem
pub(crate) const PROBLEM_TOO_SHORT: &str = "Please provide more details about your problem (at least 10 characters). The more details you provide, the better we can help!";
pub(crate) const PROBLEM_MEANINGLESS: &str =
    "Please provide a meaningful description of your problem so we can help you effectively.";
pub(crate) const PROBLEM_TOO_FEW_WORDS: &str = "Please describe your problem in more detail (at least 3 words). For example: 'I cannot log into my account after password reset.'";

pub(crate) fn name_accepted(name: &str) -> String {
    format!("Thank you, {}! Now, what's your email address?", name)
}

pub(crate) fn email_typo(suggestion: &str) -> String {
    format!(
        "Did you mean {}? Reply 'yes' to use it, or type your email address again.",
        suggestion
    )
}

pub(crate) fn delivery_failed(support_email: &str) -> String {
    format!(
        "I apologize, but I encountered an error while submitting your ticket. Send any message to try again, or contact us directly at {}.",
        support_email
    )
}

pub(crate) fn delivery_abandoned(support_email: &str) -> String {
    format!(
        "I'm sorry, we still couldn't submit your ticket. Please contact our support team directly at {}.",
        support_email
    )
}
