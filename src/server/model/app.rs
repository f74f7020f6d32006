use sea_orm::DatabaseConnection;

use crate::server::integration::Integrations;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub integrations: Integrations,
    /// Public base URL without a trailing slash
    pub app_url: String,
}
