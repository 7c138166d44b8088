//! Inventory records and money helpers.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Where a vehicle is in its resale lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    /// Bought and on the lot.
    #[default]
    InStock,
    /// Sold to a buyer.
    Sold,
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InStock => write!(f, "in_stock"),
            Self::Sold => write!(f, "sold"),
        }
    }
}

impl std::str::FromStr for VehicleStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "in_stock" => Ok(Self::InStock),
            "sold" => Ok(Self::Sold),
            other => Err(format!("unknown vehicle status: {other}")),
        }
    }
}

/// A vehicle tracked by the lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Row identifier.
    pub id: i64,
    /// Normalized VIN.
    pub vin: String,
    /// Make.
    pub brand: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// Model year.
    pub year: Option<u16>,
    /// What the lot paid, in cents.
    pub purchase_price_cents: Option<i64>,
    /// What the buyer paid, in cents.
    pub sale_price_cents: Option<i64>,
    /// Lifecycle status.
    pub status: VehicleStatus,
    /// When the vehicle was added.
    pub purchased_at: DateTime<Utc>,
    /// When the vehicle was sold.
    pub sold_at: Option<DateTime<Utc>>,
}

/// Input for adding a vehicle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewVehicle {
    /// VIN as entered; normalized on insert.
    pub vin: String,
    /// Make.
    pub brand: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// Model year; taken from the VIN when not given.
    pub year: Option<u16>,
    /// Purchase price in cents.
    pub purchase_price_cents: Option<i64>,
}

impl NewVehicle {
    /// A vehicle with only a VIN.
    #[must_use]
    pub fn new(vin: impl Into<String>) -> Self {
        Self {
            vin: vin.into(),
            ..Self::default()
        }
    }
}

/// Money spent on a vehicle after purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Row identifier.
    pub id: i64,
    /// Owning vehicle.
    pub vehicle_id: i64,
    /// Amount in cents.
    pub amount_cents: i64,
    /// What the money was for.
    pub description: String,
    /// When it was recorded.
    pub incurred_at: DateTime<Utc>,
}

/// An odometer reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MileageRecord {
    /// Row identifier.
    pub id: i64,
    /// Owning vehicle.
    pub vehicle_id: i64,
    /// Odometer reading in kilometres.
    pub odometer_km: u32,
    /// When it was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Money flowing through one vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleSummary {
    /// The vehicle's VIN.
    pub vin: String,
    /// Purchase price in cents.
    pub purchase_price_cents: Option<i64>,
    /// Sum of all expenses in cents.
    pub expenses_cents: i64,
    /// Sale price in cents.
    pub sale_price_cents: Option<i64>,
    /// Sale minus purchase minus expenses; `None` until sold.
    pub profit_cents: Option<i64>,
}

impl VehicleSummary {
    /// Total invested so far.
    #[must_use]
    pub fn cost_cents(&self) -> i64 {
        self.purchase_price_cents.unwrap_or(0) + self.expenses_cents
    }
}

fn amount_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{1,12})(?:\.(\d{1,2}))?$").expect("amount pattern is valid")
    })
}

/// Parse a decimal amount like `"1234.5"` into cents.
///
/// # Errors
///
/// Returns [`Error::InvalidAmount`] for negative numbers, more than two
/// decimals, or anything that is not a plain number.
pub fn parse_amount(input: &str) -> Result<i64> {
    let invalid = || Error::InvalidAmount {
        input: input.to_string(),
    };

    let caps = amount_pattern().captures(input.trim()).ok_or_else(invalid)?;
    let units: i64 = caps[1].parse().map_err(|_| invalid())?;
    let cents: i64 = match caps.get(2).map(|m| m.as_str()) {
        None => 0,
        Some(frac) if frac.len() == 1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
        Some(frac) => frac.parse().map_err(|_| invalid())?,
    };

    Ok(units * 100 + cents)
}

/// Format cents as a decimal amount with two places.
#[must_use]
pub fn format_amount(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_and_parse() {
        assert_eq!(VehicleStatus::InStock.to_string(), "in_stock");
        assert_eq!(VehicleStatus::Sold.to_string(), "sold");
        assert_eq!("sold".parse::<VehicleStatus>(), Ok(VehicleStatus::Sold));
        assert!("scrapped".parse::<VehicleStatus>().is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1234").unwrap(), 123_400);
        assert_eq!(parse_amount("1234.5").unwrap(), 123_450);
        assert_eq!(parse_amount("1234.05").unwrap(), 123_405);
        assert_eq!(parse_amount(" 0.99 ").unwrap(), 99);
    }

    #[test]
    fn test_parse_amount_rejects() {
        for input in ["", "-5", "1.234", "12,50", "abc", "1e3", ".5"] {
            assert!(
                matches!(parse_amount(input), Err(Error::InvalidAmount { .. })),
                "input: {input}"
            );
        }
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(123_450), "1234.50");
        assert_eq!(format_amount(5), "0.05");
        assert_eq!(format_amount(-2_500), "-25.00");
        assert_eq!(format_amount(0), "0.00");
    }

    #[test]
    fn test_summary_cost() {
        let summary = VehicleSummary {
            vin: "1HGCM82633A004352".to_string(),
            purchase_price_cents: Some(500_000),
            expenses_cents: 25_000,
            sale_price_cents: None,
            profit_cents: None,
        };
        assert_eq!(summary.cost_cents(), 525_000);
    }

    #[test]
    fn test_new_vehicle() {
        let new = NewVehicle::new("1HGCM82633A004352");
        assert_eq!(new.vin, "1HGCM82633A004352");
        assert!(new.brand.is_none());
        assert!(new.purchase_price_cents.is_none());
    }
}
