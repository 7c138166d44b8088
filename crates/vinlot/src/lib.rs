//! `vinlot` - VIN validation, decoding and inventory tracking for small used-car lots
//!
//! The core is the [`vin`] module: ISO 3779 check-digit validation and
//! offline decoding of a Vehicle Identification Number. Around it sit a
//! remote decoder for make/model details and a `SQLite` inventory of
//! vehicles, expenses and mileage.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod remote;
pub mod vin;

pub use config::Config;
pub use error::{Error, Result};
pub use inventory::{Inventory, NewVehicle, Vehicle, VehicleStatus};
pub use logging::init_logging;
pub use remote::{decode_remote, NhtsaDecoder, VinDecodedData, VinDecoder};
pub use vin::{decode_local, validate, ValidationError, ValidationResult, Vin, VinInfo};
