use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub http_bind: String,
    pub refresh_interval_seconds: u64,
    pub retention_days: u64,
    pub smoothing_window: usize,
    pub push_interval_seconds: u64,
    pub auto_nominal_percent: f64,
}

impl Config {
    /// The storage path is the one required input; everything else is an
    /// optional operator knob with defaults matching the original deployment.
    pub fn from_env(database_path: PathBuf) -> Result<Self> {
        if database_path.as_os_str().is_empty() {
            anyhow::bail!("database path resolved to an empty value");
        }
        let http_bind = env_string("FAN_DASHBOARD_HTTP_BIND", "0.0.0.0:3333");
        let refresh_interval_seconds =
            env_u64("FAN_DASHBOARD_REFRESH_INTERVAL_SECONDS", 60).max(1);
        let retention_days = env_u64("FAN_DASHBOARD_RETENTION_DAYS", 7).max(1);
        let smoothing_window = env_u64("FAN_DASHBOARD_SMOOTHING_WINDOW", 5).max(1) as usize;
        let push_interval_seconds =
            env_u64("FAN_DASHBOARD_PUSH_INTERVAL_SECONDS", 15).clamp(1, 60);
        let auto_nominal_percent = env_f64("FAN_DASHBOARD_AUTO_NOMINAL_PERCENT", 56.0);

        Ok(Self {
            database_path,
            http_bind,
            refresh_interval_seconds,
            retention_days,
            smoothing_window,
            push_interval_seconds,
            auto_nominal_percent,
        })
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }

    pub fn push_interval(&self) -> Duration {
        Duration::from_secs(self.push_interval_seconds)
    }

    pub fn retention_seconds(&self) -> i64 {
        (self.retention_days * 24 * 3600) as i64
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<f64>().ok())
        .unwrap_or(default)
}
