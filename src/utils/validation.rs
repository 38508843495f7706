use crate::domain::model::ConfidenceLevel;
use crate::utils::error::{PricingError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Market quantities (spot, volatility, strike, ...) must be strictly
/// positive and finite.
pub fn validate_positive_f64(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PricingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a positive, finite number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(PricingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(PricingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(PricingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PricingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(PricingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_confidence_level(field_name: &str, percent: u32) -> Result<ConfidenceLevel> {
    ConfidenceLevel::from_percent(percent).ok_or_else(|| PricingError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: percent.to_string(),
        reason: "Supported confidence levels: 90, 95, 99".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_f64() {
        assert!(validate_positive_f64("market.spot", 100.0).is_ok());
        assert!(validate_positive_f64("market.spot", 0.0).is_err());
        assert!(validate_positive_f64("market.volatility", -0.2).is_err());
        assert!(validate_positive_f64("market.spot", f64::NAN).is_err());
        assert!(validate_positive_f64("market.spot", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("simulation.batches", 4, 1).is_ok());
        assert!(validate_positive_number("simulation.batches", 0, 1).is_err());
    }

    #[test]
    fn test_validate_confidence_level() {
        assert_eq!(
            validate_confidence_level("confidence_level", 95).unwrap(),
            ConfidenceLevel::NinetyFive
        );
        assert!(validate_confidence_level("confidence_level", 97).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("simulation.batches", 8, 1, 256).is_ok());
        assert!(validate_range("simulation.batches", 1, 1, 256).is_ok());
        assert!(validate_range("simulation.batches", 256, 1, 256).is_ok());
        assert!(validate_range("simulation.batches", 0, 1, 256).is_err());
        assert!(validate_range("simulation.batches", 257, 1, 256).is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output_path", "./output").is_ok());
        assert!(validate_path("output_path", "").is_err());
        assert!(validate_path("output_path", "bad\0path").is_err());
    }
}
