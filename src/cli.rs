use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "fan-dashboard",
    version,
    about = "Live chassis telemetry dashboard over a SQLite sensor log"
)]
pub struct Args {
    /// Path to the SQLite file holding sensor and fan-control rows.
    pub database: PathBuf,
}
