//! Vehicle Identification Numbers.
//!
//! - **Validation**: length, character set and the ISO 3779 check digit,
//!   reported as data rather than errors.
//!
//! - **Local decoding**: WMI/VDS/VIS sections, model year, plant code and
//!   serial number, without any network access.
//!
//! # Example
//!
//! ```
//! use vinlot::vin::{decode_local, validate, Vin};
//!
//! let result = validate("1HGCM82633A004352");
//! assert!(result.is_valid);
//!
//! let info = decode_local("1HGCM82633A004352");
//! assert_eq!(info.wmi, "1HG");
//!
//! let vin: Vin = " 1hgcm82633a004352 ".parse().unwrap();
//! assert_eq!(vin.as_str(), "1HGCM82633A004352");
//! ```

mod decode;
mod validate;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use decode::{decode_local, model_year, Region, VinInfo};
pub use validate::{
    check, check_digit, transliterate, validate, ValidationError, ValidationResult,
    CHECK_DIGIT_INDEX, VIN_LENGTH,
};

/// Trim surrounding whitespace and uppercase ASCII letters.
///
/// User entry and scanned text rarely arrive in canonical form; this is the
/// only normalization applied before validation.
#[must_use]
pub fn normalize(input: &str) -> String {
    input.trim().to_ascii_uppercase()
}

/// A VIN that has passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Vin(String);

impl Vin {
    /// Validate `input` exactly as given.
    ///
    /// # Errors
    ///
    /// Returns the failing [`ValidationError`].
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        check(input)?;
        Ok(Self(input.to_owned()))
    }

    /// The VIN as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the sections of this VIN.
    #[must_use]
    pub fn info(&self) -> VinInfo {
        decode_local(&self.0)
    }

    /// World Manufacturer Identifier.
    #[must_use]
    pub fn wmi(&self) -> &str {
        // Validated VINs are ASCII, so byte offsets are character offsets.
        &self.0[..3]
    }

    /// Model year from the year table, if the code is covered.
    #[must_use]
    pub fn model_year(&self) -> Option<u16> {
        self.0.chars().nth(9).and_then(model_year)
    }
}

impl FromStr for Vin {
    type Err = ValidationError;

    /// Normalizes before validating.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(&normalize(s))
    }
}

impl TryFrom<String> for Vin {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        check(&value)?;
        Ok(Self(value))
    }
}

impl From<Vin> for String {
    fn from(vin: Vin) -> Self {
        vin.0
    }
}

impl AsRef<str> for Vin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Vin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  1hgcm82633a004352\n"), "1HGCM82633A004352");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_parse_valid() {
        let vin = Vin::parse("1HGCM82633A004352").unwrap();
        assert_eq!(vin.as_str(), "1HGCM82633A004352");
        assert_eq!(vin.wmi(), "1HG");
        assert_eq!(vin.model_year(), None);
        assert_eq!(vin.to_string(), "1HGCM82633A004352");
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(
            Vin::parse("1hgcm82633a004352"),
            Err(ValidationError::IllegalCharacter)
        );
    }

    #[test]
    fn test_from_str_normalizes() {
        let vin: Vin = " 1hgcm82633a004352 ".parse().unwrap();
        assert_eq!(vin.as_str(), "1HGCM82633A004352");
    }

    #[test]
    fn test_from_str_errors() {
        assert_eq!("123".parse::<Vin>(), Err(ValidationError::WrongLength));
        assert_eq!(
            "1HGCM82643A004352".parse::<Vin>(),
            Err(ValidationError::CheckDigitMismatch)
        );
    }

    #[test]
    fn test_info() {
        let vin = Vin::parse("1M8GDM9AXKP042788").unwrap();
        let info = vin.info();
        assert_eq!(info.wmi, vin.wmi());
        assert_eq!(info.model_year, Some(2019));
        assert_eq!(info.plant_code, Some('P'));
    }

    #[test]
    fn test_serde_round_trip_revalidates() {
        let vin = Vin::parse("1M8GDM9AXKP042788").unwrap();
        let json = serde_json::to_string(&vin).unwrap();
        assert_eq!(json, r#""1M8GDM9AXKP042788""#);

        let parsed: Vin = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vin);

        let bad: Result<Vin, _> = serde_json::from_str(r#""1M8GDM9A1KP042788""#);
        assert!(bad.is_err());
    }
}
