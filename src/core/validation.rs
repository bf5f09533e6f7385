//! Request field validation
//!
//! Every failing field of a request is collected into a [`FieldErrors`] list so
//! the caller sees all problems at once. Free-text fields are trimmed and
//! HTML-escaped before they reach storage.

use serde::Serialize;

/// Minimum password length accepted on every auth endpoint
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum length of a post title
pub const MAX_TITLE_LENGTH: usize = 255;

/// Maximum length of a comment author
pub const MAX_AUTHOR_LENGTH: usize = 150;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub msg: String,
    pub param: String,
    pub location: &'static str,
}

impl FieldError {
    pub fn new(param: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: param.into(),
            location: "body",
        }
    }
}

/// Accumulator for field errors
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, param: &str, msg: &str) {
        self.0.push(FieldError::new(param, msg));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(value)` when nothing failed, otherwise the collected errors
    pub fn finish<T>(self, value: T) -> Result<T, Vec<FieldError>> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self.0)
        }
    }

    /// Required, syntactically valid email; returns the normalized form
    pub fn email(&mut self, param: &str, value: Option<&str>) -> String {
        let normalized = value.map(normalize_email).unwrap_or_default();
        if !is_valid_email(&normalized) {
            self.push(param, "Provide a valid email address");
        }
        normalized
    }

    /// Required password of at least [`MIN_PASSWORD_LENGTH`] characters
    pub fn password(&mut self, param: &str, value: Option<&str>) -> String {
        let password = value.unwrap_or_default();
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            self.push(param, "Provide a password of 6 or more characters");
        }
        password.to_string()
    }

    /// Required non-blank text, trimmed and escaped
    pub fn required_text(
        &mut self,
        param: &str,
        value: Option<&str>,
        msg: &str,
        max_len: Option<usize>,
    ) -> String {
        let trimmed = value.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            self.push(param, msg);
            return String::new();
        }
        self.check_length(param, trimmed, max_len);
        escape_html(trimmed)
    }

    /// Optional text; blank values are treated as absent
    pub fn optional_text(
        &mut self,
        param: &str,
        value: Option<&str>,
        max_len: Option<usize>,
    ) -> Option<String> {
        let trimmed = value.map(str::trim).filter(|v| !v.is_empty())?;
        self.check_length(param, trimmed, max_len);
        Some(escape_html(trimmed))
    }

    fn check_length(&mut self, param: &str, value: &str, max_len: Option<usize>) {
        if let Some(max) = max_len
            && value.chars().count() > max
        {
            self.0.push(FieldError::new(
                param,
                format!("{} must be at most {} characters", param, max),
            ));
        }
    }
}

/// Trim and lowercase an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic structural email check: `local@domain.tld`
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    if !domain.contains('.') {
        return false;
    }

    // Every dot-separated label must be non-empty
    !domain.split('.').any(str::is_empty)
}

/// Replace HTML-significant characters with entities
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}
