//! ISO 3779 VIN validation.
//!
//! Validation runs three checks in order: length, character set, and the
//! weighted check digit at position 9. The first failing check decides the
//! reported reason.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of characters in a VIN.
pub const VIN_LENGTH: usize = 17;

/// Index of the check digit within a VIN.
pub const CHECK_DIGIT_INDEX: usize = 8;

/// Position weights for the check-digit computation.
const WEIGHTS: [u32; VIN_LENGTH] = [8, 7, 6, 5, 4, 3, 2, 10, 0, 9, 8, 7, 6, 5, 4, 3, 2];

/// Why a VIN failed validation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    /// The input is not exactly 17 characters long.
    #[error("wrong length")]
    WrongLength,

    /// The input contains a character outside `[A-HJ-NPR-Z0-9]`.
    #[error("illegal character")]
    IllegalCharacter,

    /// The character at position 9 does not match the computed check digit.
    #[error("check-digit mismatch")]
    CheckDigitMismatch,
}

impl ValidationError {
    /// Stable machine-readable reason code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::WrongLength => "wrong_length",
            Self::IllegalCharacter => "illegal_character",
            Self::CheckDigitMismatch => "check_digit_mismatch",
        }
    }
}

/// Outcome of validating a VIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the VIN passed every check.
    pub is_valid: bool,
    /// The failing check, if any.
    pub error: Option<ValidationError>,
}

impl ValidationResult {
    /// A passing result.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    /// A failing result with the given reason.
    #[must_use]
    pub fn invalid(error: ValidationError) -> Self {
        Self {
            is_valid: false,
            error: Some(error),
        }
    }
}

impl From<Result<(), ValidationError>> for ValidationResult {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => Self::valid(),
            Err(error) => Self::invalid(error),
        }
    }
}

/// Numeric value of a VIN character for the checksum.
///
/// Returns `None` for anything outside the VIN alphabet, which doubles as
/// the character-set check. I, O and Q have no entry.
#[must_use]
pub fn transliterate(c: char) -> Option<u32> {
    let value = match c {
        '0' => 0,
        '1' | 'A' | 'J' => 1,
        '2' | 'B' | 'K' | 'S' => 2,
        '3' | 'C' | 'L' | 'T' => 3,
        '4' | 'D' | 'M' | 'U' => 4,
        '5' | 'E' | 'N' | 'V' => 5,
        '6' | 'F' | 'W' => 6,
        '7' | 'G' | 'P' | 'X' => 7,
        '8' | 'H' | 'Y' => 8,
        '9' | 'R' | 'Z' => 9,
        _ => return None,
    };
    Some(value)
}

/// Check a VIN, returning the first failing rule as an error.
///
/// # Errors
///
/// Returns the [`ValidationError`] describing the first check that failed.
pub fn check(vin: &str) -> Result<(), ValidationError> {
    if vin.chars().count() != VIN_LENGTH {
        return Err(ValidationError::WrongLength);
    }

    if vin.chars().any(|c| transliterate(c).is_none()) {
        return Err(ValidationError::IllegalCharacter);
    }

    let expected = compute_check_digit(vin);
    let actual = vin.chars().nth(CHECK_DIGIT_INDEX);
    if actual == Some(expected) {
        Ok(())
    } else {
        Err(ValidationError::CheckDigitMismatch)
    }
}

/// Validate a VIN.
///
/// Never panics; every failure is reported in the returned value.
#[must_use]
pub fn validate(vin: &str) -> ValidationResult {
    check(vin).into()
}

/// The check digit a VIN should carry at position 9.
///
/// Returns `None` unless the input has the right length and character set.
#[must_use]
pub fn check_digit(vin: &str) -> Option<char> {
    if vin.chars().count() != VIN_LENGTH || vin.chars().any(|c| transliterate(c).is_none()) {
        return None;
    }
    Some(compute_check_digit(vin))
}

fn compute_check_digit(vin: &str) -> char {
    // Unmapped characters count as zero; callers check the charset first.
    let sum: u32 = vin
        .chars()
        .zip(WEIGHTS)
        .map(|(c, weight)| transliterate(c).unwrap_or(0) * weight)
        .sum();

    // A remainder of 10 has no decimal digit and is written as 'X'.
    char::from_digit(sum % 11, 10).unwrap_or('X')
}
