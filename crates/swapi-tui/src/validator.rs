//! SearchInput: validation state for one search field.
//!
//! Validity is a pure function of the current value and the `required` flag;
//! `touched` only gates whether an error is shown.

pub const MIN_LENGTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// Required field left empty.
    Required,
    /// Non-empty value shorter than `min` characters.
    TooShort { min: usize, actual: usize },
}

impl FieldError {
    pub fn message(&self) -> String {
        match self {
            FieldError::Required => "This field is required".to_string(),
            FieldError::TooShort { min, .. } => format!("Enter at least {} characters", min),
        }
    }
}

/// Minimum length always applies to non-empty values; presence only when required.
pub fn validate(value: &str, required: bool) -> Result<(), FieldError> {
    let len = value.chars().count();
    if len == 0 {
        return if required {
            Err(FieldError::Required)
        } else {
            Ok(())
        };
    }
    if len < MIN_LENGTH {
        return Err(FieldError::TooShort {
            min: MIN_LENGTH,
            actual: len,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct SearchInput {
    value: String,
    required: bool,
    touched: bool,
}

impl SearchInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn error(&self) -> Option<FieldError> {
        validate(&self.value, self.required).err()
    }

    pub fn is_valid(&self) -> bool {
        self.error().is_none()
    }

    /// The error to render: only once the field has been touched.
    pub fn visible_error(&self) -> Option<FieldError> {
        if self.touched {
            self.error()
        } else {
            None
        }
    }

    /// Reconfigure the rules and return the recomputed validity.
    pub fn set_required(&mut self, required: bool) -> bool {
        self.required = required;
        self.is_valid()
    }

    /// Clear the value without surfacing an error. Used on deactivation.
    pub fn reset(&mut self) -> bool {
        self.value.clear();
        self.touched = false;
        self.is_valid()
    }

    pub fn touch(&mut self) {
        self.touched = true;
    }

    /// Record a keystroke and return the recomputed validity.
    pub fn on_edit(&mut self, value: impl Into<String>) -> bool {
        self.value = value.into();
        self.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rules() {
        assert_eq!(validate("", false), Ok(()));
        assert_eq!(validate("", true), Err(FieldError::Required));
        assert_eq!(
            validate("ab", false),
            Err(FieldError::TooShort { min: 3, actual: 2 })
        );
        assert_eq!(
            validate("ab", true),
            Err(FieldError::TooShort { min: 3, actual: 2 })
        );
        assert_eq!(validate("abc", true), Ok(()));
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        // Three characters, six bytes.
        assert_eq!(validate("Åäö", true), Ok(()));
    }

    #[test]
    fn test_set_required_recomputes() {
        let mut input = SearchInput::new();
        assert!(input.set_required(false));
        assert!(!input.set_required(true));
        assert_eq!(input.error(), Some(FieldError::Required));
    }

    #[test]
    fn test_error_hidden_until_touched() {
        let mut input = SearchInput::new();
        input.set_required(true);
        input.on_edit("ab");
        assert!(input.visible_error().is_none());
        input.touch();
        assert_eq!(
            input.visible_error(),
            Some(FieldError::TooShort { min: 3, actual: 2 })
        );
        // Touching changes neither value nor validity.
        assert_eq!(input.value(), "ab");
        assert!(!input.is_valid());
    }

    #[test]
    fn test_reset_clears_silently() {
        let mut input = SearchInput::new();
        input.on_edit("X-wing");
        input.touch();
        assert!(input.reset());
        assert_eq!(input.value(), "");
        assert!(input.visible_error().is_none());
    }

    #[test]
    fn test_whitespace_is_not_trimmed_by_validator() {
        let mut input = SearchInput::new();
        input.set_required(true);
        assert!(input.on_edit("   "));
    }
}
