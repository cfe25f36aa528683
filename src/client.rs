//! HTTP calls against the web drive front end's same-origin API.

use reqwest::header::COOKIE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use tracing::{debug, info};

use crate::error::{DriveError, Result};
use crate::models::{DriveListResponse, FileEntry, UploadBlob, UsageInfo};
use crate::page::Browser;

/// Listing endpoint.
pub const DRIVE_PATH: &str = "/web/api/drive";

/// Quota usage endpoint.
pub const USAGE_PATH: &str = "/web/api/usage";

/// Multipart upload endpoint.
pub const UPLOAD_PATH: &str = "/web/api/upload";

/// Where the browser goes once the session has expired.
pub const LOGIN_PATH: &str = "/login";

/// Multipart field name the upload endpoint reads the file from.
pub const UPLOAD_FIELD: &str = "upload";

/// Per-file endpoints live under this path.
pub const FILES_PATH: &str = "/web/api/files";

/// Multipart field carrying the destination folder of an upload.
pub const FOLDER_FIELD: &str = "folder_id";

/// Cookie the front end keeps its session token in.
const SESSION_COOKIE: &str = "access_token";

/// Issues requests to the listing, usage, upload and download endpoints.
#[derive(Debug, Clone)]
pub struct Fetcher {
    origin: Url,
    session: Option<String>,
    http: Client,
}

impl Fetcher {
    /// Create a fetcher for the front end served at `origin`.
    ///
    /// # Arguments
    /// * `origin` - Absolute base URL, e.g. `http://localhost:8080`
    pub fn new(origin: &str) -> Result<Self> {
        let parsed =
            Url::parse(origin).map_err(|e| DriveError::InvalidOrigin(format!("{origin}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(DriveError::InvalidOrigin(origin.to_string()));
        }

        Ok(Self {
            origin: parsed,
            session: None,
            http: Client::new(),
        })
    }

    /// Send `token` as the session cookie on every request.
    pub fn with_session(mut self, token: impl Into<String>) -> Self {
        self.session = Some(token.into());
        self
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.origin
            .join(path)
            .map_err(|e| DriveError::InvalidOrigin(format!("{path}: {e}")))
    }

    /// URL of `/web/api/files/{id}[/{suffix}]` with `id` encoded as one path segment.
    fn file_url(&self, id: &str, suffix: Option<&str>) -> Result<Url> {
        if matches!(id, "" | "." | "..") {
            return Err(DriveError::InvalidId(id.to_string()));
        }
        let mut url = self.url(FILES_PATH)?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| DriveError::InvalidOrigin(self.origin.to_string()))?;
            segments.push(id);
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path)?;
        Ok(self.request_url(method, url))
    }

    fn request_url(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "issuing request");
        let mut request = self.http.request(method, url);
        if let Some(ref token) = self.session {
            request = request.header(COOKIE, format!("{SESSION_COOKIE}={token}"));
        }
        request
    }

    /// Absolute URL of the login page.
    pub fn login_url(&self) -> Result<String> {
        Ok(self.url(LOGIN_PATH)?.to_string())
    }

    /// Absolute URL of a file's download endpoint.
    pub fn download_url(&self, id: &str) -> Result<String> {
        Ok(self.file_url(id, Some("download"))?.to_string())
    }

    /// Fetch the drive listing.
    ///
    /// A 401 maps to [`DriveError::AuthExpired`]; the caller is expected to
    /// send the browser to the login page. Any other failure status maps to
    /// [`DriveError::FetchFailed`].
    pub async fn fetch_drive_listing(&self) -> Result<DriveListResponse> {
        let response = self.request(Method::GET, DRIVE_PATH)?.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(DriveError::AuthExpired);
        }
        if !status.is_success() {
            debug!(status = status.as_u16(), "listing request failed");
            return Err(DriveError::FetchFailed);
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch quota usage. A failure status yields `Ok(None)`.
    pub async fn fetch_usage(&self) -> Result<Option<UsageInfo>> {
        let response = self.request(Method::GET, USAGE_PATH)?.send().await?;
        let status = response.status();

        if !status.is_success() {
            debug!(status = status.as_u16(), "usage request failed, ignoring");
            return Ok(None);
        }

        let body = response.text().await?;
        Ok(Some(serde_json::from_str(&body)?))
    }

    /// List files page by page, optionally inside one folder.
    ///
    /// # Arguments
    /// * `limit` - Page size
    /// * `offset` - Number of entries to skip
    /// * `folder_id` - Restrict to this folder
    pub async fn list_files(
        &self,
        limit: u32,
        offset: u32,
        folder_id: Option<&str>,
    ) -> Result<Vec<FileEntry>> {
        let mut query = vec![("limit", limit.to_string()), ("offset", offset.to_string())];
        if let Some(folder_id) = folder_id {
            query.push(("folder_id", folder_id.to_string()));
        }

        let response = self
            .request(Method::GET, FILES_PATH)?
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(DriveError::AuthExpired);
        }
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(DriveError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Upload one file as the `upload` field of a multipart form.
    ///
    /// On a failure status the response body becomes the error message.
    pub async fn upload_file(&self, blob: &UploadBlob) -> Result<()> {
        self.upload_file_to(blob, None).await
    }

    /// Upload into `folder_id`, sent as an extra `folder_id` form field.
    pub async fn upload_file_to(&self, blob: &UploadBlob, folder_id: Option<&str>) -> Result<()> {
        let part = Part::bytes(blob.bytes.clone())
            .file_name(blob.name.clone())
            .mime_str(&blob.content_type())?;
        let mut form = Form::new().part(UPLOAD_FIELD, part);
        if let Some(folder_id) = folder_id {
            form = form.text(FOLDER_FIELD, folder_id.to_string());
        }

        let response = self
            .request(Method::POST, UPLOAD_PATH)?
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(DriveError::Upload(error_body));
        }

        info!(name = %blob.name, size = blob.bytes.len(), "uploaded file");
        Ok(())
    }

    /// Open a file's download endpoint in a new browsing context.
    ///
    /// The response is left to the browser.
    pub fn download_file<B: Browser>(&self, id: &str, browser: &mut B) -> Result<()> {
        let url = self.download_url(id)?;
        browser.open_tab(&url);
        Ok(())
    }

    /// Delete a file by id.
    pub async fn delete_file(&self, id: &str) -> Result<()> {
        let url = self.file_url(id, None)?;
        let response = self.request_url(Method::DELETE, url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(DriveError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        info!(%id, "deleted file");
        Ok(())
    }
}
