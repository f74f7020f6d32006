use serde::Deserialize;
use serde_json::json;

use crate::{
    model::storage::StorageFileDto,
    server::{
        error::Error,
        integration::{check_status, read_json, storage::Upload},
    },
};

pub const PROVIDER: &str = "Google Drive";

pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/drive"];

const FILE_FIELDS: &str = "id,name,mimeType,size,webViewLink";

#[derive(Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: String,
    mime_type: Option<String>,
    /// Drive reports sizes as decimal strings
    size: Option<String>,
    web_view_link: Option<String>,
}

impl From<DriveFile> for StorageFileDto {
    fn from(file: DriveFile) -> Self {
        Self {
            id: file.id,
            name: file.name,
            mime_type: file.mime_type,
            size: file.size.and_then(|s| s.parse().ok()),
            web_url: file.web_view_link,
        }
    }
}

/// Lists non-trashed files directly inside `folder`, or the drive root
pub async fn list_files(
    http: &reqwest::Client,
    api_url: &str,
    access_token: &str,
    folder: Option<&str>,
) -> Result<Vec<StorageFileDto>, Error> {
    let folder = folder.unwrap_or("root").replace('\'', "\\'");
    let query = format!("'{}' in parents and trashed = false", folder);
    let fields = format!("files({})", FILE_FIELDS);

    let response = http
        .get(format!("{}/drive/v3/files", api_url))
        .bearer_auth(access_token)
        .query(&[("q", query.as_str()), ("fields", fields.as_str())])
        .send()
        .await?;
    let response = check_status(PROVIDER, response).await?;
    let list: FileList = read_json(PROVIDER, response).await?;

    Ok(list.files.into_iter().map(StorageFileDto::from).collect())
}

/// Uploads the content, then names the file and moves it into the folder
pub async fn upload(
    http: &reqwest::Client,
    api_url: &str,
    access_token: &str,
    upload: Upload<'_>,
) -> Result<StorageFileDto, Error> {
    let response = http
        .post(format!("{}/upload/drive/v3/files", api_url))
        .bearer_auth(access_token)
        .query(&[("uploadType", "media")])
        .header(reqwest::header::CONTENT_TYPE, upload.content_type)
        .body(upload.body)
        .send()
        .await?;
    let response = check_status(PROVIDER, response).await?;
    let created: DriveFile = read_json(PROVIDER, response).await?;

    let mut query = vec![("fields", FILE_FIELDS)];
    if let Some(folder) = upload.folder {
        query.push(("addParents", folder));
    }

    let response = http
        .patch(format!("{}/drive/v3/files/{}", api_url, created.id))
        .bearer_auth(access_token)
        .query(&query)
        .json(&json!({ "name": upload.name }))
        .send()
        .await?;
    let response = check_status(PROVIDER, response).await?;
    let file: DriveFile = read_json(PROVIDER, response).await?;

    Ok(file.into())
}
