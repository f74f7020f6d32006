use entity::sea_orm_active_enums::StorageProvider;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// A file as listed by a cloud storage provider
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StorageFileDto {
    pub id: String,
    pub name: String,
    pub mime_type: Option<String>,
    pub size: Option<i64>,
    pub web_url: Option<String>,
}

#[derive(Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StorageFilesParams {
    /// Provider folder id (Google Drive) or path (OneDrive); root when absent
    pub folder: Option<String>,
}

#[derive(Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StorageCallbackParams {
    pub code: String,
    pub state: String,
}

#[derive(Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadParams {
    #[param(value_type = String)]
    pub provider: StorageProvider,
    pub name: String,
    pub folder: Option<String>,
}
