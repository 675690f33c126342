//! Common validation utilities for request payloads.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

lazy_static! {
    /// Loose international phone format: optional +, 7-15 digits, spaces and
    /// dashes allowed between groups.
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9][0-9 \-]{5,18}[0-9]$").unwrap();
}

/// Validates that a latitude value is within valid range (-90 to 90).
pub fn validate_latitude(lat: f64) -> Result<(), ValidationError> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        let mut err = ValidationError::new("latitude_range");
        err.message = Some("Latitude must be between -90 and 90".into());
        Err(err)
    }
}

/// Validates that a longitude value is within valid range (-180 to 180).
pub fn validate_longitude(lon: f64) -> Result<(), ValidationError> {
    if (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        let mut err = ValidationError::new("longitude_range");
        err.message = Some("Longitude must be between -180 and 180".into());
        Err(err)
    }
}

/// Validates a customer phone number.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Phone number is not valid".into());
        Err(err)
    }
}

/// Validates that a dish price is non-negative with at most 2 decimal places.
pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() || price.scale() > 2 {
        let mut err = ValidationError::new("price_range");
        err.message = Some("Price must be non-negative with at most 2 decimals".into());
        return Err(err);
    }
    Ok(())
}

/// Validates that a dish rating is within 0..=5 with at most 1 decimal place.
pub fn validate_rating(rating: &Decimal) -> Result<(), ValidationError> {
    let five = Decimal::from(5);
    if rating.is_sign_negative() || *rating > five || rating.scale() > 1 {
        let mut err = ValidationError::new("rating_range");
        err.message = Some("Rating must be between 0 and 5 with one decimal".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_latitude_bounds() {
        assert!(validate_latitude(0.0).is_ok());
        assert!(validate_latitude(-90.0).is_ok());
        assert!(validate_latitude(90.0).is_ok());
        assert!(validate_latitude(90.01).is_err());
        assert!(validate_latitude(-91.0).is_err());
    }

    #[test]
    fn test_longitude_bounds() {
        assert!(validate_longitude(77.5946).is_ok());
        assert!(validate_longitude(-180.0).is_ok());
        assert!(validate_longitude(180.0).is_ok());
        assert!(validate_longitude(180.5).is_err());
    }

    #[test]
    fn test_phone_formats() {
        assert!(validate_phone("+91 98765 43210").is_ok());
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("080-2345-6789").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("call me maybe").is_err());
    }

    #[test]
    fn test_price_scale_and_sign() {
        assert!(validate_price(&Decimal::from_str("150.00").unwrap()).is_ok());
        assert!(validate_price(&Decimal::from_str("0").unwrap()).is_ok());
        assert!(validate_price(&Decimal::from_str("199.999").unwrap()).is_err());
        assert!(validate_price(&Decimal::from_str("-1.00").unwrap()).is_err());
    }

    #[test]
    fn test_rating_range() {
        assert!(validate_rating(&Decimal::from_str("4.5").unwrap()).is_ok());
        assert!(validate_rating(&Decimal::from_str("0").unwrap()).is_ok());
        assert!(validate_rating(&Decimal::from_str("5.0").unwrap()).is_ok());
        assert!(validate_rating(&Decimal::from_str("5.1").unwrap()).is_err());
        assert!(validate_rating(&Decimal::from_str("4.25").unwrap()).is_err());
        assert!(validate_rating(&Decimal::from_str("-0.5").unwrap()).is_err());
    }
}
