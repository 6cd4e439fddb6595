use std::path::PathBuf;
use std::sync::Arc;

use rusqlite::{params, Connection};

use crate::charts::Charts;
use crate::config::Config;
use crate::db::Store;
use crate::state::AppState;

pub fn test_config(database_path: PathBuf) -> Config {
    Config {
        database_path,
        http_bind: "127.0.0.1:0".to_string(),
        refresh_interval_seconds: 60,
        retention_days: 7,
        // Window of 1 keeps published values equal to the raw inputs, so
        // tests can assert on exact numbers.
        smoothing_window: 1,
        push_interval_seconds: 1,
        auto_nominal_percent: 56.0,
    }
}

pub fn test_state(dir: &tempfile::TempDir) -> AppState {
    let path = dir.path().join("fan.db");
    let store = Store::open(&path).expect("open store");
    let config = test_config(path);
    let charts = Arc::new(Charts::new(&config));
    AppState {
        config,
        store,
        charts,
    }
}

pub fn insert_reading(store: &Store, timestamp: i64, temp_inlet: f64) {
    let conn = Connection::open(store.path()).expect("open connection");
    conn.execute(
        "INSERT INTO sensors (timestamp, temp_inlet, temp_exhaust, temp_cpu1, temp_cpu2, \
         rpm_fan1, rpm_fan2, rpm_fan3, rpm_fan4, rpm_fan5, rpm_fan6) \
         VALUES (?1, ?2, 30.0, 40.0, 41.0, 4200.0, 4200.0, 4300.0, 4300.0, 4400.0, 4400.0)",
        params![timestamp, temp_inlet],
    )
    .expect("insert reading");
}

pub fn insert_fan_event(store: &Store, timestamp: i64, percent: f64, auto: bool) {
    let conn = Connection::open(store.path()).expect("open connection");
    conn.execute(
        "INSERT INTO fan_control (timestamp, percent, auto) VALUES (?1, ?2, ?3)",
        params![timestamp, percent, auto],
    )
    .expect("insert fan event");
}
