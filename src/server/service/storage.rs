use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::StorageProvider;
use sea_orm::DatabaseConnection;

use crate::{
    model::{job::JobFileDto, storage::StorageFileDto},
    server::{
        data::{
            job_file::{JobFileRepository, NewJobFile},
            storage::StorageConnectionRepository,
        },
        error::{auth::AuthError, integration::IntegrationError, Error},
        integration::{
            storage::{provider_name, provider_slug, StorageClient, Upload},
            Integrations,
        },
        model::access::CurrentUser,
        service::job::JobService,
        util::validate,
    },
};

/// Tokens expiring within this window are refreshed before use
const REFRESH_MARGIN_SECS: i64 = 60;

pub struct StorageService<'a> {
    db: &'a DatabaseConnection,
    integrations: &'a Integrations,
    app_url: &'a str,
}

/// Consent URL to redirect to, with the CSRF state to keep in the session
pub struct StorageAuthorization {
    pub url: String,
    pub state: String,
}

/// A file to upload to a provider and attach to a job
pub struct JobUpload {
    pub provider: StorageProvider,
    pub name: String,
    pub folder: Option<String>,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl<'a> StorageService<'a> {
    /// Creates a new instance of [`StorageService`]
    pub fn new(
        db: &'a DatabaseConnection,
        integrations: &'a Integrations,
        app_url: &'a str,
    ) -> Self {
        Self {
            db,
            integrations,
            app_url,
        }
    }

    fn redirect_uri(&self, provider: StorageProvider) -> String {
        format!(
            "{}/api/storage/{}/callback",
            self.app_url,
            provider_slug(provider)
        )
    }

    pub fn authorize(&self, provider: StorageProvider) -> Result<StorageAuthorization, Error> {
        let client = self.integrations.storage(provider)?;
        let (url, state) = client.authorize_url(&self.redirect_uri(provider))?;

        Ok(StorageAuthorization { url, state })
    }

    /// Exchanges the authorization code and stores the user's tokens for `provider`.
    ///
    /// The CSRF state must already have been checked against the session.
    pub async fn callback(
        &self,
        user_id: i32,
        provider: StorageProvider,
        code: &str,
    ) -> Result<(), Error> {
        let client = self.integrations.storage(provider)?;
        let tokens = client
            .exchange_code(code, &self.redirect_uri(provider))
            .await?;

        StorageConnectionRepository::new(self.db)
            .upsert(user_id, provider, tokens)
            .await?;

        tracing::info!(
            user_id = %user_id,
            "Connected {} storage",
            provider_name(provider)
        );

        Ok(())
    }

    pub async fn list_files(
        &self,
        user_id: i32,
        provider: StorageProvider,
        folder: Option<&str>,
    ) -> Result<Vec<StorageFileDto>, Error> {
        let client = self.integrations.storage(provider)?;
        let access_token = self.access_token(user_id, &client).await?;

        client.list_files(&access_token, folder).await
    }

    /// Uploads a file with the user's connected account and attaches it to a job.
    ///
    /// # Returns
    /// - `Ok(JobFileDto)` - File stored at the provider and recorded on the job
    /// - `Err(Error::AuthError)` - Client accounts, or users who cannot see the job (403)
    /// - `Err(Error::RequestError)` - Job missing (404) or a blank file name (400)
    /// - `Err(Error::IntegrationError)` - Provider not configured (503), no account connected
    ///   (400) or the upload failed (502)
    pub async fn upload_to_job(
        &self,
        user: &CurrentUser,
        job_id: i32,
        upload: JobUpload,
    ) -> Result<JobFileDto, Error> {
        if user.own_client_id().is_some() {
            return Err(AuthError::Forbidden.into());
        }
        JobService::new(self.db, self.integrations)
            .visible_job(user, job_id)
            .await?;
        let name = validate::required_text("name", &upload.name)?;

        let client = self.integrations.storage(upload.provider)?;
        let access_token = self.access_token(user.id, &client).await?;

        let size_bytes = i64::try_from(upload.body.len()).ok();
        let stored = client
            .upload(
                &access_token,
                Upload {
                    folder: upload.folder.as_deref(),
                    name: &name,
                    content_type: &upload.content_type,
                    body: upload.body,
                },
            )
            .await?;

        let created = JobFileRepository::new(self.db)
            .create(NewJobFile {
                job_id,
                file_name: stored.name,
                url: stored.web_url.unwrap_or_default(),
                content_type: stored.mime_type.or(Some(upload.content_type)),
                size_bytes: stored.size.or(size_bytes),
                provider: Some(upload.provider),
                external_id: Some(stored.id),
                uploaded_by: Some(user.id),
            })
            .await?;

        Ok(created.into())
    }

    /// Current access token for the user's connection, refreshed first when it is about
    /// to expire and a refresh token is stored
    async fn access_token(
        &self,
        user_id: i32,
        client: &StorageClient<'_>,
    ) -> Result<String, Error> {
        let provider = client.provider();
        let connection_repo = StorageConnectionRepository::new(self.db);

        let connection = connection_repo
            .get(user_id, provider)
            .await?
            .ok_or(IntegrationError::NotConnected(provider_name(provider)))?;

        let expiring = connection
            .expires_at
            .is_some_and(|at| {
                at <= Utc::now().naive_utc() + Duration::seconds(REFRESH_MARGIN_SECS)
            });
        if !expiring {
            return Ok(connection.access_token);
        }

        let Some(refresh_token) = connection.refresh_token.clone() else {
            tracing::debug!(
                user_id = %user_id,
                "{} token expired without a refresh token, using it as is",
                provider_name(provider)
            );
            return Ok(connection.access_token);
        };

        let tokens = client.refresh(&refresh_token).await?;
        let connection = connection_repo.update_tokens(connection, tokens).await?;

        tracing::debug!(user_id = %user_id, "Refreshed {} token", provider_name(provider));

        Ok(connection.access_token)
    }
}

#[cfg(test)]
mod tests {
    mod authorize {
        use entity::sea_orm_active_enums::StorageProvider;
        use hangar_test_utils::{constant::TEST_APP_URL, prelude::*};

        use crate::server::{service::storage::StorageService, util::test::test_state};

        /// Expect the consent URL to redirect back to the provider's callback route
        #[tokio::test]
        async fn builds_callback_redirect() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;
            let state = test_state(&test);

            let result = StorageService::new(&state.db, &state.integrations, &state.app_url)
                .authorize(StorageProvider::Onedrive)
                .unwrap();

            let redirect = format!("{}/api/storage/onedrive/callback", TEST_APP_URL)
                .replace(':', "%3A")
                .replace('/', "%2F");
            assert!(result.url.contains(&redirect));
            assert!(result.url.contains(&result.state));

            Ok(())
        }
    }

    mod callback {
        use entity::sea_orm_active_enums::StorageProvider;
        use hangar_test_utils::{fixtures::provider, prelude::*};

        use crate::server::{
            data::storage::StorageConnectionRepository, service::storage::StorageService,
            util::test::test_state,
        };

        /// Expect the exchanged tokens stored for the user
        #[tokio::test]
        async fn stores_tokens() -> Result<(), TestError> {
            let test = TestBuilder::new()
                .with_crm_tables()
                .with_mock_endpoint(|server| {
                    server
                        .mock("POST", "/google/token")
                        .with_status(200)
                        .with_header("content-type", "application/json")
                        .with_body(provider::oauth_token("access-1", Some("refresh-1")).to_string())
                        .create()
                })
                .build()
                .await?;
            let state = test_state(&test);
            let user = test.user().insert_staff().await?;

            StorageService::new(&state.db, &state.integrations, &state.app_url)
                .callback(user.id, StorageProvider::GoogleDrive, "auth-code")
                .await
                .unwrap();

            let connection = StorageConnectionRepository::new(&test.db)
                .get(user.id, StorageProvider::GoogleDrive)
                .await?
                .unwrap();
            assert_eq!(connection.access_token, "access-1");
            assert_eq!(connection.refresh_token.as_deref(), Some("refresh-1"));
            test.assert_mocks();

            Ok(())
        }
    }

    mod list_files {
        use chrono::{Duration, Utc};
        use entity::sea_orm_active_enums::StorageProvider;
        use hangar_test_utils::{fixtures::provider, prelude::*};
        use mockito::Matcher;

        use crate::server::{
            data::storage::{StorageConnectionRepository, StorageTokens},
            error::{integration::IntegrationError, Error},
            service::storage::StorageService,
            util::test::test_state,
        };

        /// Expect an expired token to be refreshed before listing
        #[tokio::test]
        async fn refreshes_expired_token() -> Result<(), TestError> {
            let test = TestBuilder::new()
                .with_crm_tables()
                .with_mock_endpoint(|server| {
                    server
                        .mock("POST", "/google/token")
                        .with_status(200)
                        .with_header("content-type", "application/json")
                        .with_body(provider::oauth_token("access-2", None).to_string())
                        .create()
                })
                .with_mock_endpoint(|server| {
                    server
                        .mock("GET", "/drive/v3/files")
                        .match_query(Matcher::Any)
                        .match_header("authorization", "Bearer access-2")
                        .with_status(200)
                        .with_body(r#"{"files":[{"id":"f1","name":"site.jpg","size":"2048"}]}"#)
                        .create()
                })
                .build()
                .await?;
            let state = test_state(&test);
            let user = test.user().insert_staff().await?;
            StorageConnectionRepository::new(&test.db)
                .upsert(
                    user.id,
                    StorageProvider::GoogleDrive,
                    StorageTokens {
                        access_token: "access-1".to_string(),
                        refresh_token: Some("refresh-1".to_string()),
                        expires_at: Some(Utc::now().naive_utc() - Duration::minutes(5)),
                    },
                )
                .await?;

            let files = StorageService::new(&state.db, &state.integrations, &state.app_url)
                .list_files(user.id, StorageProvider::GoogleDrive, None)
                .await
                .unwrap();

            assert_eq!(files.len(), 1);
            assert_eq!(files[0].size, Some(2048));
            let connection = StorageConnectionRepository::new(&test.db)
                .get(user.id, StorageProvider::GoogleDrive)
                .await?
                .unwrap();
            assert_eq!(connection.access_token, "access-2");
            assert_eq!(connection.refresh_token.as_deref(), Some("refresh-1"));
            test.assert_mocks();

            Ok(())
        }

        /// Expect NotConnected when the user never connected the provider
        #[tokio::test]
        async fn fails_when_not_connected() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;
            let state = test_state(&test);
            let user = test.user().insert_staff().await?;

            let result = StorageService::new(&state.db, &state.integrations, &state.app_url)
                .list_files(user.id, StorageProvider::Onedrive, None)
                .await;

            assert!(matches!(
                result,
                Err(Error::IntegrationError(IntegrationError::NotConnected(_)))
            ));

            Ok(())
        }
    }

    mod upload_to_job {
        use entity::sea_orm_active_enums::{JobStatus, StorageProvider};
        use hangar_test_utils::prelude::*;

        use crate::server::{
            error::{auth::AuthError, Error},
            model::access::CurrentUser,
            service::storage::{JobUpload, StorageService},
            util::test::test_state,
        };

        /// Expect client accounts to be refused before anything is uploaded
        #[tokio::test]
        async fn refuses_clients() -> Result<(), TestError> {
            let test = test_setup_with_crm_tables!()?;
            let state = test_state(&test);
            let client = test.crm().insert_client("Acme", None).await?;
            let job = test
                .crm()
                .insert_job(client.id, "Survey", JobStatus::Scheduled, None)
                .await?;
            let client_user = CurrentUser::from(test.user().insert_client_user(client.id).await?);

            let result = StorageService::new(&state.db, &state.integrations, &state.app_url)
                .upload_to_job(
                    &client_user,
                    job.id,
                    JobUpload {
                        provider: StorageProvider::GoogleDrive,
                        name: "site.jpg".to_string(),
                        folder: None,
                        content_type: "image/jpeg".to_string(),
                        body: vec![1, 2, 3],
                    },
                )
                .await;

            assert!(matches!(
                result,
                Err(Error::AuthError(AuthError::Forbidden))
            ));

            Ok(())
        }
    }
}
