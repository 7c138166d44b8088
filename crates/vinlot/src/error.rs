//! Error types for vinlot.
//!
//! VIN validation failures are ordinary values (see
//! [`crate::vin::ValidationResult`]); this module covers everything that can
//! go wrong around them: storage, configuration, remote lookups and
//! inventory rules.

use std::path::PathBuf;
use thiserror::Error;

use crate::vin::ValidationError;

/// The main error type for vinlot operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Inventory Errors ===
    /// A VIN was rejected.
    #[error("invalid VIN '{vin}': {reason}")]
    InvalidVin {
        /// The VIN as entered.
        vin: String,
        /// Which check failed.
        reason: ValidationError,
    },

    /// No vehicle with this VIN is in the inventory.
    #[error("no vehicle with VIN {vin}")]
    VehicleNotFound {
        /// The VIN that was looked up.
        vin: String,
    },

    /// A vehicle with this VIN is already in the inventory.
    #[error("vehicle {vin} is already in the inventory")]
    DuplicateVehicle {
        /// The duplicated VIN.
        vin: String,
    },

    /// The vehicle has already been sold.
    #[error("vehicle {vin} has already been sold")]
    VehicleAlreadySold {
        /// The VIN of the sold vehicle.
        vin: String,
    },

    /// An odometer reading lower than the last one recorded.
    #[error("odometer for {vin} cannot go from {previous} km to {attempted} km")]
    MileageRegression {
        /// The VIN of the vehicle.
        vin: String,
        /// Last recorded reading.
        previous: u32,
        /// Rejected reading.
        attempted: u32,
    },

    /// A money amount could not be parsed.
    #[error("invalid amount '{input}': expected a non-negative number with at most two decimals")]
    InvalidAmount {
        /// The text as entered.
        input: String,
    },

    // === Remote Decoding Errors ===
    /// The remote decoder could not produce data for a VIN.
    #[error("remote decode of '{vin}' failed: {message}")]
    RemoteDecode {
        /// The VIN sent to the decoder.
        vin: String,
        /// Description of what went wrong.
        message: String,
    },

    /// An HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // === I/O Errors ===
    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for vinlot operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid VIN error.
    #[must_use]
    pub fn invalid_vin(vin: impl Into<String>, reason: ValidationError) -> Self {
        Self::InvalidVin {
            vin: vin.into(),
            reason,
        }
    }

    /// Create a vehicle-not-found error.
    #[must_use]
    pub fn vehicle_not_found(vin: impl Into<String>) -> Self {
        Self::VehicleNotFound { vin: vin.into() }
    }

    /// Create a remote decode error.
    #[must_use]
    pub fn remote_decode(vin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RemoteDecode {
            vin: vin.into(),
            message: message.into(),
        }
    }

    /// Check if this error means the vehicle does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::VehicleNotFound { .. })
    }

    /// Check if this error came from the remote decoder.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteDecode { .. } | Self::Http(_))
    }
}
