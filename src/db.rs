use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags, Row};

use crate::trace::Timestamped;

/// One row from the `sensors` table: chassis temperatures plus the six
/// chassis fan tachometers, sampled by an external collector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub timestamp: i64,
    pub temp_inlet: f64,
    pub temp_exhaust: f64,
    pub temp_cpu1: f64,
    pub temp_cpu2: f64,
    pub rpm_fan1: f64,
    pub rpm_fan2: f64,
    pub rpm_fan3: f64,
    pub rpm_fan4: f64,
    pub rpm_fan5: f64,
    pub rpm_fan6: f64,
}

/// One row from the `fan_control` table. `auto` means the BMC is governing
/// the duty cycle itself and the stored percent is not meaningful.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanControlEvent {
    pub timestamp: i64,
    pub percent: f64,
    pub auto: bool,
}

impl Timestamped for SensorReading {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

impl Timestamped for FanControlEvent {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// Handle on the SQLite sensor log. Reads open a fresh read-only connection
/// per fetch; the file is shared with the external writer process.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Opens the store, creating the file and both tables if absent. Errors
    /// here are fatal: the server must not come up without a usable store.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open sensor store {}", path.display()))?;
        ensure_schema(&conn)
            .with_context(|| format!("failed to ensure schema in {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn fetch_sensor_readings(&self, since: i64) -> Result<Vec<SensorReading>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_sensor_readings(&path, since))
            .await
            .context("sensor fetch task panicked")?
    }

    pub async fn fetch_fan_control_events(&self, since: i64) -> Result<Vec<FanControlEvent>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_fan_control_events(&path, since))
            .await
            .context("fan control fetch task panicked")?
    }
}

fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sensors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp INTEGER NOT NULL DEFAULT (strftime('%s','now')),
            temp_inlet REAL NOT NULL,
            temp_exhaust REAL NOT NULL,
            temp_cpu1 REAL NOT NULL,
            temp_cpu2 REAL NOT NULL,
            rpm_fan1 REAL NOT NULL,
            rpm_fan2 REAL NOT NULL,
            rpm_fan3 REAL NOT NULL,
            rpm_fan4 REAL NOT NULL,
            rpm_fan5 REAL NOT NULL,
            rpm_fan6 REAL NOT NULL
        );
        CREATE TABLE IF NOT EXISTS fan_control (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp INTEGER NOT NULL DEFAULT (strftime('%s','now')),
            percent REAL NOT NULL,
            auto INTEGER NOT NULL
        );
        "#,
    )
}

fn open_read_only(path: &Path) -> Result<Connection> {
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("failed to open sensor store {}", path.display()))
}

fn read_sensor_readings(path: &Path, since: i64) -> Result<Vec<SensorReading>> {
    let conn = open_read_only(path)?;
    let mut stmt = conn.prepare_cached(
        "SELECT id, timestamp, temp_inlet, temp_exhaust, temp_cpu1, temp_cpu2, \
         rpm_fan1, rpm_fan2, rpm_fan3, rpm_fan4, rpm_fan5, rpm_fan6 \
         FROM sensors WHERE timestamp > ?1 ORDER BY timestamp, id",
    )?;
    let rows = stmt.query_map(rusqlite::params![since], |row| {
        let id: i64 = row.get(0)?;
        Ok((id, decode_sensor_row(row)))
    })?;
    collect_rows(rows, "sensors")
}

fn read_fan_control_events(path: &Path, since: i64) -> Result<Vec<FanControlEvent>> {
    let conn = open_read_only(path)?;
    let mut stmt = conn.prepare_cached(
        "SELECT id, timestamp, percent, auto FROM fan_control \
         WHERE timestamp > ?1 ORDER BY timestamp, id",
    )?;
    let rows = stmt.query_map(rusqlite::params![since], |row| {
        let id: i64 = row.get(0)?;
        Ok((id, decode_fan_control_row(row)))
    })?;
    collect_rows(rows, "fan_control")
}

fn decode_sensor_row(row: &Row<'_>) -> rusqlite::Result<SensorReading> {
    Ok(SensorReading {
        timestamp: row.get(1)?,
        temp_inlet: row.get(2)?,
        temp_exhaust: row.get(3)?,
        temp_cpu1: row.get(4)?,
        temp_cpu2: row.get(5)?,
        rpm_fan1: row.get(6)?,
        rpm_fan2: row.get(7)?,
        rpm_fan3: row.get(8)?,
        rpm_fan4: row.get(9)?,
        rpm_fan5: row.get(10)?,
        rpm_fan6: row.get(11)?,
    })
}

fn decode_fan_control_row(row: &Row<'_>) -> rusqlite::Result<FanControlEvent> {
    Ok(FanControlEvent {
        timestamp: row.get(1)?,
        percent: row.get(2)?,
        auto: row.get(3)?,
    })
}

/// Rows that fail column decoding are skipped, not fatal: one bad row must
/// never blank the whole dashboard. Statement-level errors still propagate.
fn collect_rows<T>(
    rows: impl Iterator<Item = rusqlite::Result<(i64, rusqlite::Result<T>)>>,
    table: &str,
) -> Result<Vec<T>> {
    let mut records = Vec::new();
    for item in rows {
        let (id, decoded) = item.with_context(|| format!("failed to read {table} rows"))?;
        match decoded {
            Ok(record) => records.push(record),
            Err(err) => {
                tracing::warn!(error = %err, table, row_id = id, "skipping undecodable row");
            }
        }
    }
    Ok(records)
}
