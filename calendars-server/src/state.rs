use calendars_core::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }
}
