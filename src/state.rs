//! Application state shared across all handlers

use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::services::mailer::Mailer;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub mailer: Mailer,
    pub config: Config,
}

impl AppState {
    pub fn new(db: DatabaseConnection, mailer: Mailer, config: Config) -> Self {
        Self { db, mailer, config }
    }
}

// Allow handlers that only touch the database to extract the connection directly
impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
