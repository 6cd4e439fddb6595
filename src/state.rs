use std::sync::Arc;

use crate::charts::Charts;
use crate::config::Config;
use crate::db::Store;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub charts: Arc<Charts>,
}
