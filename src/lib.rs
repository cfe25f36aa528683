//! web_drive - client for the drive page of the web file storage front end.
//!
//! This library provides functionality to:
//! - List the user's uploaded files and render them as a card grid
//! - Show storage quota usage as text and a proportional bar
//! - Upload files (drop zone or file picker) and open downloads
//!
//! # Example
//!
//! ```no_run
//! use web_drive::{DriveClient, Fetcher, RecordingBrowser};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let fetcher = Fetcher::new("http://localhost:8080")?.with_session("token");
//!     let mut client = DriveClient::new(fetcher, RecordingBrowser::new());
//!
//!     client.on_page_ready().await;
//!     println!("{}", client.page().files_grid().inner_html());
//!
//!     Ok(())
//! }
//! ```

pub mod binder;
pub mod client;
pub mod error;
pub mod models;
pub mod page;
pub mod render;
pub mod sanitize;

// Re-exports for convenience
pub use binder::{DriveClient, EventKind, EventOutcome, RefreshOutcome, UiEvent};
pub use client::Fetcher;
pub use error::{DriveError, Result};
pub use models::{DriveListResponse, FileEntry, UploadBlob, UsageInfo};
pub use page::{Anchor, Browser, BrowserAction, Page, RecordingBrowser};
pub use sanitize::escape_html;
