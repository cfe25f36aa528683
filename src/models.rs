//! Data models for the web drive API responses.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::error::{DriveError, Result};

/// Metadata for one uploaded file, as returned by the listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct FileEntry {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub download_count: Option<u64>,
}

/// A folder in the listing. Not rendered on the page.
#[derive(Debug, Clone, Deserialize)]
pub struct FolderEntry {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub created_at: String,
}

/// Ids are opaque to the client; the server sends them as integers.
fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let opt: Option<T> = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// Response from `GET /web/api/drive`.
#[derive(Debug, Default, Deserialize)]
pub struct DriveListResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<FileEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub folders: Vec<FolderEntry>,
}

/// Response from `GET /web/api/usage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct UsageInfo {
    pub used_bytes: u64,
    pub quota_bytes: u64,
    #[serde(default)]
    pub available_bytes: Option<u64>,
}

impl UsageInfo {
    pub fn new(used_bytes: u64, quota_bytes: u64) -> Self {
        Self {
            used_bytes,
            quota_bytes,
            available_bytes: None,
        }
    }
}

/// A named binary blob handed to the upload endpoint.
#[derive(Debug, Clone)]
pub struct UploadBlob {
    pub name: String,
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
}

impl UploadBlob {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Read a local file into a blob named after its file name.
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                DriveError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("not a file path: {}", path.display()),
                ))
            })?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(name, bytes))
    }

    /// The declared MIME type, or one guessed from the name.
    pub fn content_type(&self) -> String {
        match &self.mime_type {
            Some(mime) => mime.clone(),
            None => mime_guess::from_path(&self.name)
                .first_or_octet_stream()
                .to_string(),
        }
    }
}

impl fmt::Display for FileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{} MB\t{}",
            self.id,
            format_megabytes(self.size),
            self.original_name.as_deref().unwrap_or_default()
        )
    }
}

const MB: f64 = 1024.0 * 1024.0;
const GB: f64 = MB * 1024.0;

/// Bytes as megabytes with exactly two decimals (`bytes / 1024 / 1024`).
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / MB)
}

/// Bytes as gigabytes with one decimal.
pub fn format_gigabytes(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / GB)
}

/// Format a server timestamp in the local time zone.
pub fn format_timestamp(raw: &str) -> String {
    format_timestamp_in(raw, &Local)
}

/// Format a server timestamp in `tz`, e.g. `3/7/2024, 2:05:09 PM`.
///
/// Values that do not parse are returned unchanged.
pub fn format_timestamp_in<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match parse_timestamp(raw) {
        Some(utc) => utc
            .with_timezone(tz)
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string(),
        None => raw.to_string(),
    }
}

/// RFC 3339, or a naive ISO-8601 datetime taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}
