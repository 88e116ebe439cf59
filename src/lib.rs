pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod forms;
pub mod identity;
pub mod join;
pub mod session;
pub mod store;
pub mod ui;
pub mod views;

pub use db::DbPool;

use config::Config;
use std::sync::Arc;
use std::time::Duration;

use crate::session::SessionStore;
use crate::store::ClinicStore;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ClinicStore>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn ClinicStore>) -> Self {
        let idle_timeout = Duration::from_secs(config.session.idle_timeout_minutes * 60);
        Self {
            config,
            store,
            sessions: Arc::new(SessionStore::new(idle_timeout)),
        }
    }

    /// How long banners stay visible before removing themselves
    pub fn banner_ttl(&self) -> Duration {
        Duration::from_millis(self.config.session.banner_timeout_ms)
    }
}
