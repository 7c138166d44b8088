//! `vinlot` - CLI for VIN checks and lot inventory
//!
//! This binary exposes VIN validation and decoding, and the vehicle,
//! expense and mileage records of the inventory.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::warn;

use vinlot::cli::{
    CheckCommand, Cli, Command, ConfigCommand, DecodeCommand, ExpenseCommand, MileageCommand,
    VehicleCommand,
};
use vinlot::inventory::{format_amount, parse_amount};
use vinlot::vin::{decode_local, normalize, validate};
use vinlot::{decode_remote, init_logging, Config, Inventory, NewVehicle};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    // Validation reports a broken file itself, so it must not depend on
    // loading one first.
    if let Command::Config(ConfigCommand::Validate { file }) = &cli.command {
        return Ok(handle_validate_config(file.clone().or(cli.config)));
    }

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Check(cmd) => handle_check(&cmd),
        Command::Decode(cmd) => handle_decode(&config, &cmd).await,
        Command::Vehicle(cmd) => handle_vehicle(&config, cmd).await,
        Command::Expense(cmd) => handle_expense(&config, cmd),
        Command::Mileage(cmd) => handle_mileage(&config, cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_inventory(config: &Config) -> anyhow::Result<Inventory> {
    let path = config.database_path();
    let inventory = Inventory::open(&path)
        .with_context(|| format!("opening inventory at {}", path.display()))?;
    Ok(inventory.with_require_valid_vin(config.inventory.require_valid_vin))
}

fn handle_check(cmd: &CheckCommand) -> anyhow::Result<ExitCode> {
    let vin = normalize(&cmd.vin);
    let result = validate(&vin);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if let Some(error) = result.error {
        println!("{vin}: invalid ({error})");
    } else {
        println!("{vin}: valid");
    }

    Ok(if result.is_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn handle_decode(config: &Config, cmd: &DecodeCommand) -> anyhow::Result<ExitCode> {
    let vin = normalize(&cmd.vin);

    if cmd.remote {
        let data = decode_remote(&config.decoder, &vin).await?;
        if cmd.json {
            println!("{}", serde_json::to_string_pretty(&data)?);
        } else {
            let show = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
            println!("VIN:           {}", data.vin);
            println!("Brand:         {}", show(data.brand.clone()));
            println!("Model:         {}", show(data.model.clone()));
            println!("Year:          {}", show(data.year.map(|y| y.to_string())));
            println!("Body:          {}", show(data.body_type.clone()));
            println!("Engine:        {}", show(data.engine_type.clone()));
            println!(
                "Displacement:  {}",
                show(data.engine_volume.map(|l| format!("{l:.1} L")))
            );
            println!("Fuel:          {}", show(data.fuel_type.clone()));
            println!("Transmission:  {}", show(data.transmission.clone()));
            println!("Drive:         {}", show(data.drive_type.clone()));
            println!("Doors:         {}", show(data.doors.map(|d| d.to_string())));
            println!("Seats:         {}", show(data.seats.map(|s| s.to_string())));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let info = decode_local(&vin);
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("VIN:           {vin}");
        println!("WMI:           {}", info.wmi);
        println!("VDS:           {}", info.vds);
        println!("VIS:           {}", info.vis);
        println!(
            "Region:        {}",
            info.region.map_or_else(|| "-".to_string(), |r| r.to_string())
        );
        println!(
            "Model year:    {}",
            info.model_year
                .map_or_else(|| "-".to_string(), |y| y.to_string())
        );
        println!(
            "Plant code:    {}",
            info.plant_code
                .map_or_else(|| "-".to_string(), |c| c.to_string())
        );
        println!("Serial:        {}", info.serial_number);
        if let Some(error) = validate(&vin).error {
            println!();
            println!("Warning: VIN is not valid ({error})");
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn handle_vehicle(config: &Config, cmd: VehicleCommand) -> anyhow::Result<ExitCode> {
    let inventory = open_inventory(config)?;
    let currency = &config.inventory.currency;

    match cmd {
        VehicleCommand::Add {
            vin,
            brand,
            model,
            year,
            price,
            lookup,
        } => {
            let mut new = NewVehicle {
                vin,
                brand,
                model,
                year,
                purchase_price_cents: price.as_deref().map(parse_amount).transpose()?,
            };

            if lookup {
                match decode_remote(&config.decoder, &new.vin).await {
                    Ok(data) => {
                        new.brand = new.brand.or(data.brand);
                        new.model = new.model.or(data.model);
                        new.year = new.year.or(data.year);
                    }
                    Err(e) => warn!("Remote lookup failed, adding without it: {}", e),
                }
            }

            let vehicle = inventory.add_vehicle(new)?;
            println!("Added {} (id {})", vehicle.vin, vehicle.id);
        }
        VehicleCommand::List { status, json } => {
            let vehicles = inventory.list_vehicles(status.map(Into::into))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&vehicles)?);
            } else if vehicles.is_empty() {
                println!("No vehicles.");
            } else {
                println!(
                    "{:<17}  {:<10}  {:<14}  {:<14}  {:>4}  {:>12}",
                    "VIN", "STATUS", "BRAND", "MODEL", "YEAR", "PAID"
                );
                for v in vehicles {
                    println!(
                        "{:<17}  {:<10}  {:<14}  {:<14}  {:>4}  {:>12}",
                        v.vin,
                        v.status,
                        v.brand.unwrap_or_default(),
                        v.model.unwrap_or_default(),
                        v.year.map(|y| y.to_string()).unwrap_or_default(),
                        v.purchase_price_cents
                            .map(format_amount)
                            .unwrap_or_default(),
                    );
                }
            }
        }
        VehicleCommand::Show { vin, json } => {
            let vehicle = inventory
                .get_vehicle(&vin)?
                .ok_or_else(|| vinlot::Error::vehicle_not_found(normalize(&vin)))?;
            let summary = inventory.summary(&vin)?;

            if json {
                let value = serde_json::json!({
                    "vehicle": vehicle,
                    "summary": summary,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                let money = |cents: Option<i64>| {
                    cents.map_or_else(
                        || "-".to_string(),
                        |c| format!("{} {currency}", format_amount(c)),
                    )
                };
                println!("VIN:        {}", vehicle.vin);
                println!("Status:     {}", vehicle.status);
                println!("Brand:      {}", vehicle.brand.as_deref().unwrap_or("-"));
                println!("Model:      {}", vehicle.model.as_deref().unwrap_or("-"));
                println!(
                    "Year:       {}",
                    vehicle.year.map_or_else(|| "-".to_string(), |y| y.to_string())
                );
                println!("Purchased:  {}", vehicle.purchased_at.format("%Y-%m-%d"));
                if let Some(sold_at) = vehicle.sold_at {
                    println!("Sold:       {}", sold_at.format("%Y-%m-%d"));
                }
                println!();
                println!("Paid:       {}", money(summary.purchase_price_cents));
                println!("Expenses:   {}", money(Some(summary.expenses_cents)));
                println!("Sold for:   {}", money(summary.sale_price_cents));
                println!("Profit:     {}", money(summary.profit_cents));
            }
        }
        VehicleCommand::Sell { vin, price } => {
            let vehicle = inventory.sell_vehicle(&vin, parse_amount(&price)?)?;
            let summary = inventory.summary(&vehicle.vin)?;
            println!("Sold {}", vehicle.vin);
            if let Some(profit) = summary.profit_cents {
                println!("Profit: {} {currency}", format_amount(profit));
            }
        }
        VehicleCommand::Remove { vin } => {
            if inventory.remove_vehicle(&vin)? {
                println!("Removed {}", normalize(&vin));
            } else {
                println!("No vehicle with VIN {}", normalize(&vin));
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_expense(config: &Config, cmd: ExpenseCommand) -> anyhow::Result<ExitCode> {
    let inventory = open_inventory(config)?;
    let currency = &config.inventory.currency;

    match cmd {
        ExpenseCommand::Add {
            vin,
            amount,
            description,
        } => {
            let expense = inventory.add_expense(&vin, parse_amount(&amount)?, &description)?;
            println!(
                "Recorded {} {currency} for {}",
                format_amount(expense.amount_cents),
                normalize(&vin)
            );
        }
        ExpenseCommand::List { vin } => {
            let expenses = inventory.list_expenses(&vin)?;
            let mut total = 0;
            for expense in &expenses {
                total += expense.amount_cents;
                println!(
                    "{}  {:>12}  {}",
                    expense.incurred_at.format("%Y-%m-%d"),
                    format_amount(expense.amount_cents),
                    expense.description
                );
            }
            println!("Total: {} {currency}", format_amount(total));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_mileage(config: &Config, cmd: MileageCommand) -> anyhow::Result<ExitCode> {
    let inventory = open_inventory(config)?;

    match cmd {
        MileageCommand::Add { vin, km } => {
            inventory.record_mileage(&vin, km)?;
            println!("Recorded {km} km for {}", normalize(&vin));
        }
        MileageCommand::List { vin } => {
            for record in inventory.mileage_history(&vin)? {
                println!(
                    "{}  {:>9} km",
                    record.recorded_at.format("%Y-%m-%d %H:%M"),
                    record.odometer_km
                );
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Decoder]");
                println!("  Base URL:           {}", config.decoder.base_url);
                println!("  Timeout (secs):     {}", config.decoder.timeout_secs);
                println!();
                println!("[Inventory]");
                println!(
                    "  Require valid VIN:  {}",
                    config.inventory.require_valid_vin
                );
                println!("  Currency:           {}", config.inventory.currency);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => return Ok(handle_validate_config(file)),
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_validate_config(file: Option<PathBuf>) -> ExitCode {
    let path = file.unwrap_or_else(Config::default_config_path);
    println!("Validating configuration: {}", path.display());
    match Config::load_from(Some(path)) {
        Ok(_) => {
            println!("Configuration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("Configuration error: {e}");
            ExitCode::FAILURE
        }
    }
}
