//! Field validators for account data
//!
//! Pure predicates: no side effects, no panics on any input. The service
//! layer maps a failed check to the matching error outcome.

use regex::Regex;

/// Allowed special characters in a password
pub const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// A contact number is exactly 10 decimal digits
pub fn is_valid_contact(contact: &str) -> bool {
    let re = Regex::new(r"^[0-9]{10}$").unwrap();
    re.is_match(contact)
}

/// An email is `local@domain.tld`-shaped: letters/digits/`_.+-` before the
/// `@`, letters/digits/`-` for the domain label, then a dot-separated suffix
pub fn is_valid_email(email: &str) -> bool {
    let re = Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$").unwrap();
    re.is_match(email)
}

/// A password needs length >= 8, at least one uppercase letter, one lowercase
/// letter, one digit and one of `@$!%*?&`, drawing only from those classes
pub fn is_valid_password(password: &str) -> bool {
    if password.len() < 8 {
        return false;
    }

    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_special = false;

    for c in password.chars() {
        if c.is_ascii_uppercase() {
            has_upper = true;
        } else if c.is_ascii_lowercase() {
            has_lower = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        } else if PASSWORD_SPECIALS.contains(c) {
            has_special = true;
        } else {
            // Outside the allowed character classes
            return false;
        }
    }

    has_upper && has_lower && has_digit && has_special
}
