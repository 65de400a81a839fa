//! Subject email validation
//!
//! An explicit RFC 5322 subset rather than a platform mail parser, so the
//! accepted grammar is reproducible: dot-atom local part, letter/digit/hyphen
//! domain labels, no quoted strings or comments.

use crate::CoreError;
use once_cell::sync::Lazy;
use regex::Regex;

/// User-facing message for a missing email, kept stable for API clients
pub const EMPTY_EMAIL_MESSAGE: &str = "User email cannot be null or empty.";

/// Maximum total address length accepted
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum local-part length accepted
const MAX_LOCAL_PART_LENGTH: usize = 64;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    // dot-atom local part "@" domain of letter/digit/hyphen labels
    Regex::new(
        r"(?x)
        ^
        [A-Za-z0-9!\#$%&'*+/=?^_`{|}~-]+ (?: \. [A-Za-z0-9!\#$%&'*+/=?^_`{|}~-]+ )*
        @
        [A-Za-z0-9] (?: [A-Za-z0-9-]{0,61} [A-Za-z0-9] )?
        (?: \. [A-Za-z0-9] (?: [A-Za-z0-9-]{0,61} [A-Za-z0-9] )? )*
        $
        ",
    )
    .expect("email pattern is valid")
});

/// Validate the subject email for a new approval instance.
///
/// An empty value is `InvalidInput` and a malformed value is
/// `EmailValidationFailed`; callers present different remediation for the
/// two cases.
pub fn validate_subject_email(email: &str) -> Result<(), CoreError> {
    if email.is_empty() {
        return Err(CoreError::InvalidInput(EMPTY_EMAIL_MESSAGE.to_string()));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(CoreError::EmailValidationFailed(email.to_string()));
    }

    if let Some(local_part) = email.split('@').next() {
        if local_part.len() > MAX_LOCAL_PART_LENGTH {
            return Err(CoreError::EmailValidationFailed(email.to_string()));
        }
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(CoreError::EmailValidationFailed(email.to_string()));
    }

    Ok(())
}
