pub mod charts;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod state;
pub mod trace;

#[cfg(test)]
pub mod test_support;
