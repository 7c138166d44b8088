//! `SQLite` schema definitions for the inventory.

/// SQL statement to create the vehicles table.
pub const CREATE_VEHICLES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS vehicles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    vin TEXT NOT NULL UNIQUE,
    brand TEXT,
    model TEXT,
    year INTEGER,
    purchase_price_cents INTEGER,
    sale_price_cents INTEGER,
    status TEXT NOT NULL,
    purchased_at TEXT NOT NULL,
    sold_at TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create the expenses table.
pub const CREATE_EXPENSES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS expenses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    vehicle_id INTEGER NOT NULL REFERENCES vehicles(id) ON DELETE CASCADE,
    amount_cents INTEGER NOT NULL,
    description TEXT NOT NULL,
    incurred_at TEXT NOT NULL
)
";

/// SQL statement to create the mileage table.
pub const CREATE_MILEAGE_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS mileage (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    vehicle_id INTEGER NOT NULL REFERENCES vehicles(id) ON DELETE CASCADE,
    odometer_km INTEGER NOT NULL,
    recorded_at TEXT NOT NULL
)
";

/// Index for listing vehicles by status.
pub const CREATE_STATUS_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_vehicles_status ON vehicles(status)
";

/// Index for per-vehicle expense lookups.
pub const CREATE_EXPENSE_VEHICLE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_expenses_vehicle ON expenses(vehicle_id)
";

/// Index for per-vehicle mileage lookups.
pub const CREATE_MILEAGE_VEHICLE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_mileage_vehicle ON mileage(vehicle_id, odometer_km)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_VEHICLES_TABLE,
    CREATE_EXPENSES_TABLE,
    CREATE_MILEAGE_TABLE,
    CREATE_STATUS_INDEX,
    CREATE_EXPENSE_VEHICLE_INDEX,
    CREATE_MILEAGE_VEHICLE_INDEX,
    CREATE_METADATA_TABLE,
];
