//! Vehicle inventory for the lot.
//!
//! This module provides `SQLite`-backed storage for vehicles, their
//! expenses and odometer history. Every vehicle is keyed by a normalized
//! VIN that has passed validation.

pub mod migrations;
pub mod models;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::vin::{check, decode_local, normalize, ValidationError};

pub use models::{
    format_amount, parse_amount, Expense, MileageRecord, NewVehicle, Vehicle, VehicleStatus,
    VehicleSummary,
};

const VEHICLE_COLUMNS: &str = "id, vin, brand, model, year, purchase_price_cents, \
                               sale_price_cents, status, purchased_at, sold_at";

/// Inventory store.
#[derive(Debug)]
pub struct Inventory {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
    /// Reject VINs with a bad check digit.
    require_valid_vin: bool,
}

impl Inventory {
    /// Open or create an inventory database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or database cannot be created or
    /// schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening inventory at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        Self::with_connection(path, conn)
    }

    /// Create an in-memory inventory for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Self::with_connection(PathBuf::from(":memory:"), conn)
    }

    fn with_connection(path: PathBuf, conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        migrations::initialize_schema(&conn)?;
        Ok(Self {
            path,
            conn,
            require_valid_vin: true,
        })
    }

    /// Whether VINs with a check-digit mismatch are rejected (default).
    #[must_use]
    pub fn with_require_valid_vin(mut self, require: bool) -> Self {
        self.require_valid_vin = require;
        self
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Normalize and validate a VIN for insertion.
    fn accept_vin(&self, input: &str) -> Result<String> {
        let vin = normalize(input);
        match check(&vin) {
            Ok(()) => Ok(vin),
            Err(ValidationError::CheckDigitMismatch) if !self.require_valid_vin => {
                warn!("Accepting {} despite check-digit mismatch", vin);
                Ok(vin)
            }
            Err(reason) => Err(Error::invalid_vin(vin, reason)),
        }
    }

    /// Add a vehicle.
    ///
    /// The model year falls back to the year encoded in the VIN.
    ///
    /// # Errors
    ///
    /// Returns an error if the VIN is rejected or already present, the
    /// purchase price is negative, or the insert fails.
    pub fn add_vehicle(&self, new: NewVehicle) -> Result<Vehicle> {
        if let Some(price) = new.purchase_price_cents {
            ensure_non_negative(price)?;
        }
        let vin = self.accept_vin(&new.vin)?;
        if self.get_vehicle(&vin)?.is_some() {
            return Err(Error::DuplicateVehicle { vin });
        }

        let year = new.year.or_else(|| decode_local(&vin).model_year);
        let purchased_at = Utc::now().to_rfc3339();

        self.conn.execute(
            r"
            INSERT INTO vehicles (vin, brand, model, year, purchase_price_cents, status, purchased_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
            params![
                vin,
                new.brand,
                new.model,
                year,
                new.purchase_price_cents,
                VehicleStatus::InStock.to_string(),
                purchased_at,
            ],
        )?;

        info!("Added vehicle {}", vin);
        self.require_vehicle(&vin)
    }

    /// Look up a vehicle by VIN.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_vehicle(&self, vin: &str) -> Result<Option<Vehicle>> {
        let vin = normalize(vin);
        let vehicle = self
            .conn
            .query_row(
                &format!("SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE vin = ?1"),
                [vin],
                Self::row_to_vehicle,
            )
            .optional()?;
        Ok(vehicle)
    }

    fn require_vehicle(&self, vin: &str) -> Result<Vehicle> {
        self.get_vehicle(vin)?
            .ok_or_else(|| Error::vehicle_not_found(normalize(vin)))
    }

    /// List vehicles, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_vehicles(&self, status: Option<VehicleStatus>) -> Result<Vec<Vehicle>> {
        let vehicles = if let Some(status) = status {
            let mut stmt = self.conn.prepare(&format!(
                "SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE status = ?1 \
                 ORDER BY purchased_at DESC, id DESC"
            ))?;
            let rows = stmt.query_map([status.to_string()], Self::row_to_vehicle)?;
            rows.collect::<std::result::Result<Vec<_>, _>>()?
        } else {
            let mut stmt = self.conn.prepare(&format!(
                "SELECT {VEHICLE_COLUMNS} FROM vehicles ORDER BY purchased_at DESC, id DESC"
            ))?;
            let rows = stmt.query_map([], Self::row_to_vehicle)?;
            rows.collect::<std::result::Result<Vec<_>, _>>()?
        };
        Ok(vehicles)
    }

    /// Mark a vehicle as sold.
    ///
    /// # Errors
    ///
    /// Returns an error if the price is negative, or the vehicle does not
    /// exist or is already sold.
    pub fn sell_vehicle(&self, vin: &str, price_cents: i64) -> Result<Vehicle> {
        ensure_non_negative(price_cents)?;
        let vehicle = self.require_vehicle(vin)?;
        if vehicle.status == VehicleStatus::Sold {
            return Err(Error::VehicleAlreadySold { vin: vehicle.vin });
        }

        self.conn.execute(
            "UPDATE vehicles SET status = ?1, sale_price_cents = ?2, sold_at = ?3 WHERE id = ?4",
            params![
                VehicleStatus::Sold.to_string(),
                price_cents,
                Utc::now().to_rfc3339(),
                vehicle.id,
            ],
        )?;

        info!("Sold vehicle {} for {}", vehicle.vin, format_amount(price_cents));
        self.require_vehicle(&vehicle.vin)
    }

    /// Remove a vehicle along with its expenses and mileage.
    ///
    /// Returns `true` if a vehicle was removed, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn remove_vehicle(&self, vin: &str) -> Result<bool> {
        let vin = normalize(vin);
        let affected = self
            .conn
            .execute("DELETE FROM vehicles WHERE vin = ?1", [&vin])?;
        if affected > 0 {
            info!("Removed vehicle {}", vin);
        }
        Ok(affected > 0)
    }

    /// Record an expense against a vehicle.
    ///
    /// # Errors
    ///
    /// Returns an error if the vehicle does not exist, the amount is
    /// negative, or the insert fails.
    pub fn add_expense(&self, vin: &str, amount_cents: i64, description: &str) -> Result<Expense> {
        ensure_non_negative(amount_cents)?;
        let vehicle = self.require_vehicle(vin)?;
        let incurred_at = Utc::now();

        self.conn.execute(
            "INSERT INTO expenses (vehicle_id, amount_cents, description, incurred_at) \
             VALUES (?1, ?2, ?3, ?4)",
            params![
                vehicle.id,
                amount_cents,
                description,
                incurred_at.to_rfc3339()
            ],
        )?;

        info!(
            "Recorded expense of {} on {}",
            format_amount(amount_cents),
            vehicle.vin
        );
        Ok(Expense {
            id: self.conn.last_insert_rowid(),
            vehicle_id: vehicle.id,
            amount_cents,
            description: description.to_string(),
            incurred_at,
        })
    }

    /// Expenses for a vehicle, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the vehicle does not exist or the query fails.
    pub fn list_expenses(&self, vin: &str) -> Result<Vec<Expense>> {
        let vehicle = self.require_vehicle(vin)?;
        let mut stmt = self.conn.prepare(
            "SELECT id, vehicle_id, amount_cents, description, incurred_at FROM expenses \
             WHERE vehicle_id = ?1 ORDER BY incurred_at ASC, id ASC",
        )?;
        let expenses = stmt
            .query_map([vehicle.id], |row| {
                Ok(Expense {
                    id: row.get(0)?,
                    vehicle_id: row.get(1)?,
                    amount_cents: row.get(2)?,
                    description: row.get(3)?,
                    incurred_at: parse_timestamp(&row.get::<_, String>(4)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    /// Record an odometer reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the vehicle does not exist or the reading is
    /// lower than the highest one already recorded.
    pub fn record_mileage(&self, vin: &str, odometer_km: u32) -> Result<MileageRecord> {
        let vehicle = self.require_vehicle(vin)?;

        let previous: Option<u32> = self.conn.query_row(
            "SELECT MAX(odometer_km) FROM mileage WHERE vehicle_id = ?1",
            [vehicle.id],
            |row| row.get(0),
        )?;
        if let Some(previous) = previous {
            if odometer_km < previous {
                return Err(Error::MileageRegression {
                    vin: vehicle.vin,
                    previous,
                    attempted: odometer_km,
                });
            }
        }

        let recorded_at = Utc::now();
        self.conn.execute(
            "INSERT INTO mileage (vehicle_id, odometer_km, recorded_at) VALUES (?1, ?2, ?3)",
            params![vehicle.id, odometer_km, recorded_at.to_rfc3339()],
        )?;

        debug!("Recorded {} km for {}", odometer_km, vehicle.vin);
        Ok(MileageRecord {
            id: self.conn.last_insert_rowid(),
            vehicle_id: vehicle.id,
            odometer_km,
            recorded_at,
        })
    }

    /// Odometer readings for a vehicle, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the vehicle does not exist or the query fails.
    pub fn mileage_history(&self, vin: &str) -> Result<Vec<MileageRecord>> {
        let vehicle = self.require_vehicle(vin)?;
        let mut stmt = self.conn.prepare(
            "SELECT id, vehicle_id, odometer_km, recorded_at FROM mileage \
             WHERE vehicle_id = ?1 ORDER BY recorded_at ASC, id ASC",
        )?;
        let records = stmt
            .query_map([vehicle.id], |row| {
                Ok(MileageRecord {
                    id: row.get(0)?,
                    vehicle_id: row.get(1)?,
                    odometer_km: row.get(2)?,
                    recorded_at: parse_timestamp(&row.get::<_, String>(3)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Purchase, expenses, sale and profit for a vehicle.
    ///
    /// # Errors
    ///
    /// Returns an error if the vehicle does not exist or the query fails.
    pub fn summary(&self, vin: &str) -> Result<VehicleSummary> {
        let vehicle = self.require_vehicle(vin)?;
        let expenses_cents: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(amount_cents), 0) FROM expenses WHERE vehicle_id = ?1",
            [vehicle.id],
            |row| row.get(0),
        )?;

        let profit_cents = vehicle
            .sale_price_cents
            .map(|sale| sale - vehicle.purchase_price_cents.unwrap_or(0) - expenses_cents);

        Ok(VehicleSummary {
            vin: vehicle.vin,
            purchase_price_cents: vehicle.purchase_price_cents,
            expenses_cents,
            sale_price_cents: vehicle.sale_price_cents,
            profit_cents,
        })
    }

    /// Count vehicles in the inventory.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM vehicles", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Convert a database row to a Vehicle.
    fn row_to_vehicle(row: &rusqlite::Row) -> rusqlite::Result<Vehicle> {
        let status_str: String = row.get(7)?;
        let status = status_str.parse().unwrap_or_else(|_| {
            warn!("Unknown vehicle status: {}, defaulting to in_stock", status_str);
            VehicleStatus::InStock
        });

        let purchased_at: String = row.get(8)?;
        let sold_at: Option<String> = row.get(9)?;

        Ok(Vehicle {
            id: row.get(0)?,
            vin: row.get(1)?,
            brand: row.get(2)?,
            model: row.get(3)?,
            year: row.get(4)?,
            purchase_price_cents: row.get(5)?,
            sale_price_cents: row.get(6)?,
            status,
            purchased_at: parse_timestamp(&purchased_at),
            sold_at: sold_at.as_deref().map(parse_timestamp),
        })
    }
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value).map_or_else(
        |_| {
            warn!("Unparseable timestamp {:?}, using now", value);
            Utc::now()
        },
        |dt| dt.with_timezone(&Utc),
    )
}

fn ensure_non_negative(cents: i64) -> Result<()> {
    if cents < 0 {
        return Err(Error::InvalidAmount {
            input: format_amount(cents),
        });
    }
    Ok(())
}
