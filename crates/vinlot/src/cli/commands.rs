//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Check command arguments.
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// The VIN to validate (trimmed and uppercased first)
    pub vin: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Decode command arguments.
#[derive(Debug, Args)]
pub struct DecodeCommand {
    /// The VIN to decode
    pub vin: String,

    /// Look up make, model and specs from the remote service
    #[arg(short, long)]
    pub remote: bool,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Vehicle commands.
#[derive(Debug, Subcommand)]
pub enum VehicleCommand {
    /// Add a vehicle to the lot
    Add {
        /// The vehicle's VIN
        vin: String,

        /// Make
        #[arg(long)]
        brand: Option<String>,

        /// Model name
        #[arg(long)]
        model: Option<String>,

        /// Model year (defaults to the year encoded in the VIN)
        #[arg(long)]
        year: Option<u16>,

        /// Purchase price, e.g. 4500.00
        #[arg(long)]
        price: Option<String>,

        /// Fill in missing make, model and year from the remote service
        #[arg(long)]
        lookup: bool,
    },

    /// List vehicles
    List {
        /// Only show vehicles with this status
        #[arg(short, long, value_enum)]
        status: Option<StatusArg>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show a vehicle with its costs
    Show {
        /// The vehicle's VIN
        vin: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Mark a vehicle as sold
    Sell {
        /// The vehicle's VIN
        vin: String,

        /// Sale price, e.g. 5200.00
        #[arg(long)]
        price: String,
    },

    /// Remove a vehicle and its history
    Remove {
        /// The vehicle's VIN
        vin: String,
    },
}

/// Expense commands.
#[derive(Debug, Subcommand)]
pub enum ExpenseCommand {
    /// Record an expense
    Add {
        /// The vehicle's VIN
        vin: String,

        /// Amount, e.g. 120.50
        amount: String,

        /// What the money was for
        description: String,
    },

    /// List expenses for a vehicle
    List {
        /// The vehicle's VIN
        vin: String,
    },
}

/// Mileage commands.
#[derive(Debug, Subcommand)]
pub enum MileageCommand {
    /// Record an odometer reading
    Add {
        /// The vehicle's VIN
        vin: String,

        /// Odometer reading in kilometres
        km: u32,
    },

    /// List odometer readings for a vehicle
    List {
        /// The vehicle's VIN
        vin: String,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Vehicle status argument for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// On the lot
    InStock,
    /// Sold
    Sold,
}

impl From<StatusArg> for crate::inventory::VehicleStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::InStock => Self::InStock,
            StatusArg::Sold => Self::Sold,
        }
    }
}
