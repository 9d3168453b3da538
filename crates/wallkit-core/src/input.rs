//! Parsing of raw user-entered values.
//!
//! Form fields arrive as text; these helpers turn them into validated numbers
//! so that nothing downstream has to deal with malformed input.

use crate::constants::MAX_OVERLAP;
use crate::error::ValidationError;

/// Parses a strictly positive, finite dimension.
pub fn parse_dimension(field: &str, input: &str) -> Result<f64, ValidationError> {
    let value = parse_number(field, input)?;
    if value <= 0.0 {
        return Err(ValidationError::non_positive(field, value));
    }
    Ok(value)
}

/// Parses an overlap given in percent and returns it as a fraction in `[0, 0.5]`.
pub fn parse_overlap_percent(input: &str) -> Result<f64, ValidationError> {
    let fraction = parse_number("Overlap", input)? / 100.0;
    validate_overlap(fraction)
}

/// Checks that an overlap fraction lies in `[0, 0.5]`.
pub fn validate_overlap(fraction: f64) -> Result<f64, ValidationError> {
    if !fraction.is_finite() || !(0.0..=MAX_OVERLAP).contains(&fraction) {
        return Err(ValidationError::OverlapOutOfRange { value: fraction });
    }
    Ok(fraction)
}

fn parse_number(field: &str, input: &str) -> Result<f64, ValidationError> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotANumber {
            field: field.to_string(),
            input: input.to_string(),
        })?;
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension("Wall width", " 4.5 "), Ok(4.5));
        assert!(matches!(
            parse_dimension("Wall width", "abc"),
            Err(ValidationError::NotANumber { .. })
        ));
        assert!(matches!(
            parse_dimension("Wall width", "0"),
            Err(ValidationError::NonPositive { .. })
        ));
        assert!(matches!(
            parse_dimension("Wall width", "inf"),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_parse_overlap_percent() {
        assert_eq!(parse_overlap_percent("10"), Ok(0.1));
        assert_eq!(parse_overlap_percent("0"), Ok(0.0));
        assert_eq!(parse_overlap_percent("50"), Ok(0.5));
        assert!(parse_overlap_percent("51").is_err());
        assert!(parse_overlap_percent("-1").is_err());
        assert!(parse_overlap_percent("ten").is_err());
    }
}
