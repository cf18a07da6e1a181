//! Input checks shared by the record input structs.

use crate::errors::CoreError;

/// Reject negative, NaN, and infinite monetary amounts.
///
/// # Errors
///
/// Returns `CoreError::Validation` naming the field.
pub fn check_amount(field: &str, amount: f64) -> Result<(), CoreError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{field} must be a finite non-negative amount, got {amount}"
        )))
    }
}

/// Reject empty or whitespace-only key fields.
///
/// # Errors
///
/// Returns `CoreError::Validation` naming the field.
pub fn check_not_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::Validation(format!("{field} must not be blank")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts() {
        assert!(check_amount("balance", 0.0).is_ok());
        assert!(check_amount("balance", 12.5).is_ok());
        assert!(check_amount("balance", -0.01).is_err());
        assert!(check_amount("balance", f64::NAN).is_err());
        assert!(check_amount("balance", f64::INFINITY).is_err());
    }

    #[test]
    fn blank_fields() {
        assert!(check_not_blank("email", "a@b.c").is_ok());
        assert!(check_not_blank("email", "   ").is_err());
        let err = check_not_blank("title", "").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: title must not be blank");
    }
}
