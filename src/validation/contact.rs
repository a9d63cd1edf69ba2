use garde::Validate;
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    models::contact::NewContact,
};

/// The request payload of the contact form.
///
/// Every field is optional at the wire level so a missing field becomes a
/// validation error instead of a deserialization failure.
#[derive(Deserialize, Debug, Default)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// The normalized form checked by `garde`.
#[derive(Validate, Debug)]
struct ContactForm {
    #[garde(length(chars, min = 2))]
    name: String,
    #[garde(custom(email_pattern))]
    email: String,
    #[garde(length(chars, min = 5))]
    message: String,
}

/// Validates a contact request and returns the normalized submission.
///
/// All fields are trimmed and the email is lowercased before the length and
/// pattern checks run.
///
/// # Arguments
///
/// * `request` - The raw contact form payload.
///
/// # Returns
///
/// A `Result` containing the normalized `NewContact`, or
/// `AppError::Validation` naming the first missing field or every failed check.
pub fn validate_contact(request: ContactRequest) -> Result<NewContact> {
    let name = required(request.name, "Name")?;
    let email = required(request.email, "Email")?.to_lowercase();
    let message = required(request.message, "Message")?;

    let form = ContactForm { name, email, message };
    form.validate().map_err(|report| {
        let mut messages: Vec<&str> = Vec::new();
        for (path, _) in report.iter() {
            let message = match path.to_string().as_str() {
                "name" => "Name must be at least 2 characters",
                "email" => "Please provide a valid email",
                "message" => "Message must be at least 5 characters",
                _ => "Invalid contact form",
            };
            if !messages.contains(&message) {
                messages.push(message);
            }
        }
        AppError::Validation(messages.join(". "))
    })?;

    Ok(NewContact {
        name: form.name,
        email: form.email,
        message: form.message,
    })
}

/// Trims a field and rejects it when absent or blank.
fn required(value: Option<String>, field: &str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(AppError::Validation(format!("{} is required", field))),
    }
}

#[allow(clippy::ptr_arg)]
fn email_pattern(value: &String, _context: &()) -> garde::Result {
    if matches_email_pattern(value) {
        Ok(())
    } else {
        Err(garde::Error::new("Please provide a valid email"))
    }
}

/// Checks `local@domain.tld`: no whitespace, something before an `@`, and a
/// dot with at least one character on each side after it.
///
/// # Arguments
///
/// * `email` - The trimmed, lowercased address.
///
/// # Returns
///
/// `true` when the address has the expected shape.
pub fn matches_email_pattern(email: &str) -> bool {
    if email.is_empty() || email.chars().any(is_pattern_whitespace) {
        return false;
    }

    let Some((at, _)) = email.char_indices().skip(1).find(|&(_, c)| c == '@') else {
        return false;
    };

    let domain = &email[at + 1..];
    domain
        .char_indices()
        .skip(1)
        .any(|(i, c)| c == '.' && i + 1 < domain.len())
}

/// The whitespace class of ECMAScript regular expressions (`\s`).
///
/// Unlike `char::is_whitespace` it includes U+FEFF and excludes U+0085.
fn is_pattern_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{0B}'
            | '\u{0C}'
            | '\r'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}
