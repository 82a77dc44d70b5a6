//! Input validation for form edits.
//!
//! Only the bounds a form widget would enforce are checked here: unit prices
//! cannot go below zero and quantities start at one. Text fields are taken
//! as-is.

use rust_decimal::Decimal;
use std::fmt;

/// Trait for validating request objects.
pub trait Validator {
    /// Validate the state of the object.
    fn validate(&self) -> Result<(), String>;
}

/// Validation error with a field path and a user-facing message.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    pub message: String,
    /// Suggestion for how to fix the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn negative_amount(field: &str, label: &str, value: Decimal) -> Self {
        Self::new(field, format!("{} cannot be negative (got {})", label, value))
            .with_suggestion(format!("Enter {} as 0.000 or more", label.to_lowercase()))
    }

    pub fn quantity_too_small(field: &str, value: i64) -> Self {
        Self::new(field, format!("Quantity must be at least 1 (got {})", value))
            .with_suggestion("Remove the item instead of setting its quantity to zero")
    }

    pub fn quantity_too_large(field: &str, value: i64) -> Self {
        Self::new(field, format!("Quantity {} is out of range", value))
    }

    pub fn amount_too_large(field: &str) -> Self {
        Self::new(field, "The resulting invoice amount is too large")
            .with_suggestion("Lower the unit price or quantity")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors with formatted output.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Numbered, one-error-per-line message for API responses.
    pub fn to_message(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!(
            "Validation failed: {} error(s) found",
            self.errors.len()
        )];

        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }

        parts.join("\n")
    }

    /// Ok if no errors, Err with the formatted message otherwise.
    pub fn into_result(self) -> Result<(), String> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.to_message())
        }
    }
}

/// Unit prices start at 0.000.
pub fn validate_non_negative(
    value: Decimal,
    field: &str,
    label: &str,
    errors: &mut ValidationErrors,
) {
    if value.is_sign_negative() && !value.is_zero() {
        errors.add(ValidationError::negative_amount(field, label, value));
    }
}

/// Quantities are whole numbers starting at 1 and must fit in a `u32`.
pub fn validate_quantity(value: i64, field: &str, errors: &mut ValidationErrors) {
    if value < 1 {
        errors.add(ValidationError::quantity_too_small(field, value));
    } else if value > i64::from(u32::MAX) {
        errors.add(ValidationError::quantity_too_large(field, value));
    }
}
