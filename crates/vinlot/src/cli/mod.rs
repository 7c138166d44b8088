//! Command-line interface for vinlot.
//!
//! This module provides the CLI structure for the `vinlot` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CheckCommand, ConfigCommand, DecodeCommand, ExpenseCommand, MileageCommand, StatusArg,
    VehicleCommand,
};

/// vinlot - VINs and inventory for a used-car lot
///
/// Validate and decode Vehicle Identification Numbers, and keep track of
/// the vehicles on the lot: what they cost, what was spent on them, their
/// odometer history and what they sold for.
#[derive(Debug, Parser)]
#[command(name = "vinlot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a VIN's length, characters and check digit
    Check(CheckCommand),

    /// Decode a VIN locally or through the remote service
    Decode(DecodeCommand),

    /// Manage vehicles on the lot
    #[command(subcommand)]
    Vehicle(VehicleCommand),

    /// Record and list expenses
    #[command(subcommand)]
    Expense(ExpenseCommand),

    /// Record and list odometer readings
    #[command(subcommand)]
    Mileage(MileageCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
