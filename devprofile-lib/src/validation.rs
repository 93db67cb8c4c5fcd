use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ProfileError, Result};
use crate::profile::Profile;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // local@domain.tld, nothing stricter
        Regex::new(r".+@.+\..+")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Checks the required fields of an already normalized profile.
///
/// Every failing field gets its own message, in field order.
pub fn validate(profile: &Profile) -> Result<()> {
    let mut details = Vec::new();

    if profile.name.is_empty() {
        details.push("Path `name` is required.".to_string());
    }

    if profile.email.is_empty() {
        details.push("Path `email` is required.".to_string());
    } else if !email_regex().is_match(&profile.email) {
        details.push(format!("Path `email` is invalid ({}).", profile.email));
    }

    if details.is_empty() {
        Ok(())
    } else {
        Err(ProfileError::Validation(details))
    }
}
