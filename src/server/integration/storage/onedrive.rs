use reqwest::Url;
use serde::Deserialize;

use crate::{
    model::storage::StorageFileDto,
    server::{
        error::Error,
        integration::{check_status, read_json, storage::Upload},
    },
};

pub const PROVIDER: &str = "OneDrive";

pub const SCOPES: &[&str] = &["Files.ReadWrite", "offline_access"];

#[derive(Deserialize)]
struct DriveItemList {
    #[serde(default)]
    value: Vec<DriveItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveItem {
    id: String,
    name: String,
    size: Option<i64>,
    web_url: Option<String>,
    file: Option<FileFacet>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileFacet {
    mime_type: Option<String>,
}

impl From<DriveItem> for StorageFileDto {
    fn from(item: DriveItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            mime_type: item.file.and_then(|f| f.mime_type),
            size: item.size,
            web_url: item.web_url,
        }
    }
}

/// Builds a Graph URL addressing an item by path, e.g. `/me/drive/root:/Jobs/a.jpg:/content`.
///
/// Without any path the drive root itself is addressed.
fn item_url(
    api_url: &str,
    folder: Option<&str>,
    name: Option<&str>,
    action: &str,
) -> Result<Url, Error> {
    let mut url = Url::parse(api_url)
        .map_err(|e| Error::ParseError(format!("Invalid OneDrive API URL {}: {}", api_url, e)))?;

    let parts: Vec<&str> = folder
        .into_iter()
        .flat_map(|f| f.split('/'))
        .filter(|s| !s.is_empty())
        .chain(name)
        .collect();

    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            Error::ParseError(format!("OneDrive API URL {} cannot be a base", api_url))
        })?;
        segments.pop_if_empty().extend(["me", "drive"]);

        match parts.split_last() {
            None => {
                segments.extend(["root", action]);
            }
            Some((last, rest)) => {
                segments.push("root:");
                segments.extend(rest);
                segments.push(&format!("{}:", last));
                segments.push(action);
            }
        }
    }

    Ok(url)
}

pub async fn list_files(
    http: &reqwest::Client,
    api_url: &str,
    access_token: &str,
    folder: Option<&str>,
) -> Result<Vec<StorageFileDto>, Error> {
    let url = item_url(api_url, folder, None, "children")?;

    let response = http.get(url).bearer_auth(access_token).send().await?;
    let response = check_status(PROVIDER, response).await?;
    let list: DriveItemList = read_json(PROVIDER, response).await?;

    Ok(list.value.into_iter().map(StorageFileDto::from).collect())
}

/// Uploads with a simple PUT, replacing any file of the same name
pub async fn upload(
    http: &reqwest::Client,
    api_url: &str,
    access_token: &str,
    upload: Upload<'_>,
) -> Result<StorageFileDto, Error> {
    let url = item_url(api_url, upload.folder, Some(upload.name), "content")?;

    let response = http
        .put(url)
        .bearer_auth(access_token)
        .header(reqwest::header::CONTENT_TYPE, upload.content_type)
        .body(upload.body)
        .send()
        .await?;
    let response = check_status(PROVIDER, response).await?;
    let item: DriveItem = read_json(PROVIDER, response).await?;

    Ok(item.into())
}
