//! Wires the page affordances to fetch and render calls.

use tracing::{debug, error, info, warn};

use crate::client::Fetcher;
use crate::error::{DriveError, Result};
use crate::models::UploadBlob;
use crate::page::{Anchor, Browser, Page};
use crate::render::{render_files, render_listing_error, render_usage};

/// Hover visual applied to the drop zone while something is dragged over it.
pub const HOVER_CLASS: &str = "dragover";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    DragOver,
    DragLeave,
    Drop,
    Change,
    Click,
}

/// A UI event delivered to one anchor element.
#[derive(Debug, Clone)]
pub struct UiEvent {
    pub target: Anchor,
    pub kind: EventKind,
    /// Files carried by a drop, or selected in the file input.
    pub files: Vec<UploadBlob>,
}

impl UiEvent {
    pub fn new(target: Anchor, kind: EventKind) -> Self {
        Self {
            target,
            kind,
            files: Vec::new(),
        }
    }

    pub fn with_files(mut self, files: Vec<UploadBlob>) -> Self {
        self.files = files;
        self
    }

    pub fn click(target: Anchor) -> Self {
        Self::new(target, EventKind::Click)
    }

    pub fn drop_files(files: Vec<UploadBlob>) -> Self {
        Self::new(Anchor::Dropzone, EventKind::Drop).with_files(files)
    }

    pub fn select_files(files: Vec<UploadBlob>) -> Self {
        Self::new(Anchor::FileInput, EventKind::Change).with_files(files)
    }
}

/// What dispatching an event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    /// A binding matched the event.
    pub handled: bool,
    /// The browser's default action for the event was suppressed.
    pub default_prevented: bool,
}

/// How a refresh ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Rendered,
    ListingFailed,
    /// The session expired and the browser was sent to the login page.
    Redirected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handler {
    ShowHover,
    ClearHover,
    UploadDropped,
    UploadSelected,
    OpenPicker,
    Refresh,
}

struct Binding {
    anchor: Anchor,
    kind: EventKind,
    suppress_default: bool,
    handler: Handler,
}

static BINDINGS: &[Binding] = &[
    Binding {
        anchor: Anchor::Dropzone,
        kind: EventKind::DragOver,
        suppress_default: true,
        handler: Handler::ShowHover,
    },
    Binding {
        anchor: Anchor::Dropzone,
        kind: EventKind::DragLeave,
        suppress_default: false,
        handler: Handler::ClearHover,
    },
    Binding {
        anchor: Anchor::Dropzone,
        kind: EventKind::Drop,
        suppress_default: true,
        handler: Handler::UploadDropped,
    },
    Binding {
        anchor: Anchor::FileInput,
        kind: EventKind::Change,
        suppress_default: false,
        handler: Handler::UploadSelected,
    },
    Binding {
        anchor: Anchor::UploadButton,
        kind: EventKind::Click,
        suppress_default: false,
        handler: Handler::OpenPicker,
    },
    Binding {
        anchor: Anchor::RefreshButton,
        kind: EventKind::Click,
        suppress_default: false,
        handler: Handler::Refresh,
    },
];

/// The drive page client: fetcher, page context and browser in one place.
pub struct DriveClient<B: Browser> {
    fetcher: Fetcher,
    page: Page,
    browser: B,
}

impl<B: Browser> DriveClient<B> {
    pub fn new(fetcher: Fetcher, browser: B) -> Self {
        Self {
            fetcher,
            page: Page::new(),
            browser,
        }
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut B {
        &mut self.browser
    }

    /// Page-ready: initial refresh.
    pub async fn on_page_ready(&mut self) -> RefreshOutcome {
        self.refresh().await
    }

    /// Reload the listing, then usage.
    ///
    /// A usage failure never touches the listing result. An expired session
    /// redirects to the login page and skips all rendering.
    pub async fn refresh(&mut self) -> RefreshOutcome {
        let outcome = match self.fetcher.fetch_drive_listing().await {
            Ok(listing) => {
                render_files(&mut self.page, &listing.files);
                debug!(files = listing.files.len(), "rendered drive listing");
                RefreshOutcome::Rendered
            }
            Err(DriveError::AuthExpired) => {
                warn!("session expired, redirecting to login");
                match self.fetcher.login_url() {
                    Ok(url) => self.browser.navigate(&url),
                    Err(e) => error!(error = %e, "cannot build login URL"),
                }
                return RefreshOutcome::Redirected;
            }
            Err(err) => {
                render_listing_error(&mut self.page, &err);
                RefreshOutcome::ListingFailed
            }
        };

        self.refresh_usage().await;
        outcome
    }

    async fn refresh_usage(&mut self) {
        match self.fetcher.fetch_usage().await {
            Ok(Some(usage)) => render_usage(&mut self.page, &usage),
            Ok(None) => {}
            Err(e) => debug!(error = %e, "usage unavailable"),
        }
    }

    /// Deliver `event` through the binding table.
    pub async fn dispatch(&mut self, event: UiEvent) -> EventOutcome {
        let Some(binding) = BINDINGS
            .iter()
            .find(|b| b.anchor == event.target && b.kind == event.kind)
        else {
            return EventOutcome::default();
        };

        match binding.handler {
            Handler::ShowHover => self.page.element_mut(Anchor::Dropzone).add_class(HOVER_CLASS),
            Handler::ClearHover => self
                .page
                .element_mut(Anchor::Dropzone)
                .remove_class(HOVER_CLASS),
            Handler::UploadDropped => {
                self.page
                    .element_mut(Anchor::Dropzone)
                    .remove_class(HOVER_CLASS);
                if let Some(file) = event.files.first() {
                    self.upload_then_refresh(file, None).await;
                }
            }
            Handler::UploadSelected => {
                if let Some(file) = event.files.first() {
                    self.upload_then_refresh(file, None).await;
                }
            }
            Handler::OpenPicker => self.browser.open_file_picker(),
            Handler::Refresh => {
                self.refresh().await;
            }
        }

        EventOutcome {
            handled: true,
            default_prevented: binding.suppress_default,
        }
    }

    /// Upload one file; refresh only if it was accepted.
    ///
    /// A rejection is shown to the user as an alert with the server's text
    /// and yields `None`.
    pub async fn upload_then_refresh(
        &mut self,
        file: &UploadBlob,
        folder_id: Option<&str>,
    ) -> Option<RefreshOutcome> {
        match self.fetcher.upload_file_to(file, folder_id).await {
            Ok(()) => Some(self.refresh().await),
            Err(e) => {
                error!(name = %file.name, error = %e, "upload failed");
                self.browser.alert(&e.to_string());
                None
            }
        }
    }

    /// Click on the download button of the `index`-th rendered card.
    pub fn click_download(&mut self, index: usize) -> bool {
        let Some(id) = self
            .page
            .files_grid()
            .download_bindings()
            .get(index)
            .cloned()
        else {
            return false;
        };
        self.download(&id)
    }

    /// Open the download endpoint for `id`.
    pub fn download(&mut self, id: &str) -> bool {
        match self.fetcher.download_file(id, &mut self.browser) {
            Ok(()) => true,
            Err(e) => {
                error!(%id, error = %e, "cannot open download");
                false
            }
        }
    }

    /// Delete a file, then refresh.
    pub async fn delete(&mut self, id: &str) -> Result<RefreshOutcome> {
        self.fetcher.delete_file(id).await?;
        info!(%id, "file removed, refreshing");
        Ok(self.refresh().await)
    }
}
