//! The page context: anchor elements supplied by the HTML shell and the
//! browser side effects the client can trigger.

use std::collections::BTreeSet;
use std::fmt;

/// Anchor elements the page shell must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Anchor {
    FilesGrid,
    Usage,
    Dropzone,
    FileInput,
    UploadButton,
    RefreshButton,
}

impl Anchor {
    pub const ALL: [Anchor; 6] = [
        Anchor::FilesGrid,
        Anchor::Usage,
        Anchor::Dropzone,
        Anchor::FileInput,
        Anchor::UploadButton,
        Anchor::RefreshButton,
    ];

    /// The element id in the page shell.
    pub fn dom_id(self) -> &'static str {
        match self {
            Anchor::FilesGrid => "filesGrid",
            Anchor::Usage => "usage",
            Anchor::Dropzone => "dropzone",
            Anchor::FileInput => "fileInput",
            Anchor::UploadButton => "uploadButton",
            Anchor::RefreshButton => "refreshBtn",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dom_id())
    }
}

/// One anchor element's mutable state.
#[derive(Debug, Clone, Default)]
pub struct Element {
    inner_html: String,
    classes: BTreeSet<String>,
    download_bindings: Vec<String>,
}

impl Element {
    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }

    /// Replace the element's content. Bindings on the old content go with it.
    pub fn set_inner_html(&mut self, html: impl Into<String>) {
        self.inner_html = html.into();
        self.download_bindings.clear();
    }

    pub fn clear(&mut self) {
        self.set_inner_html(String::new());
    }

    pub fn append_html(&mut self, html: &str) {
        self.inner_html.push_str(html);
    }

    /// Bind a download affordance for `file_id`; returns its index.
    pub fn bind_download(&mut self, file_id: impl Into<String>) -> usize {
        self.download_bindings.push(file_id.into());
        self.download_bindings.len() - 1
    }

    /// File ids of the download affordances inside this element, in render order.
    pub fn download_bindings(&self) -> &[String] {
        &self.download_bindings
    }

    pub fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// Explicit handle on every anchor element, passed to the renderer and
/// the binder instead of looking elements up ambiently.
#[derive(Debug, Clone, Default)]
pub struct Page {
    files_grid: Element,
    usage: Element,
    dropzone: Element,
    file_input: Element,
    upload_button: Element,
    refresh_button: Element,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self, anchor: Anchor) -> &Element {
        match anchor {
            Anchor::FilesGrid => &self.files_grid,
            Anchor::Usage => &self.usage,
            Anchor::Dropzone => &self.dropzone,
            Anchor::FileInput => &self.file_input,
            Anchor::UploadButton => &self.upload_button,
            Anchor::RefreshButton => &self.refresh_button,
        }
    }

    pub fn element_mut(&mut self, anchor: Anchor) -> &mut Element {
        match anchor {
            Anchor::FilesGrid => &mut self.files_grid,
            Anchor::Usage => &mut self.usage,
            Anchor::Dropzone => &mut self.dropzone,
            Anchor::FileInput => &mut self.file_input,
            Anchor::UploadButton => &mut self.upload_button,
            Anchor::RefreshButton => &mut self.refresh_button,
        }
    }

    pub fn files_grid(&self) -> &Element {
        &self.files_grid
    }

    pub fn usage(&self) -> &Element {
        &self.usage
    }

    pub fn dropzone(&self) -> &Element {
        &self.dropzone
    }
}

/// Browser effects other than DOM mutation.
pub trait Browser {
    /// Full-page navigation.
    fn navigate(&mut self, url: &str);

    /// Open `url` in a new browsing context.
    fn open_tab(&mut self, url: &str);

    /// Blocking user-facing alert.
    fn alert(&mut self, message: &str);

    /// Open the native file picker behind the file input.
    fn open_file_picker(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserAction {
    Navigate(String),
    OpenTab(String),
    Alert(String),
    OpenFilePicker,
}

/// A browser that records what it was asked to do.
#[derive(Debug, Clone, Default)]
pub struct RecordingBrowser {
    actions: Vec<BrowserAction>,
}

impl RecordingBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> &[BrowserAction] {
        &self.actions
    }

    pub fn alerts(&self) -> Vec<&str> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                BrowserAction::Alert(msg) => Some(msg.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn take_actions(&mut self) -> Vec<BrowserAction> {
        std::mem::take(&mut self.actions)
    }
}

impl Browser for RecordingBrowser {
    fn navigate(&mut self, url: &str) {
        self.actions.push(BrowserAction::Navigate(url.to_string()));
    }

    fn open_tab(&mut self, url: &str) {
        self.actions.push(BrowserAction::OpenTab(url.to_string()));
    }

    fn alert(&mut self, message: &str) {
        self.actions.push(BrowserAction::Alert(message.to_string()));
    }

    fn open_file_picker(&mut self) {
        self.actions.push(BrowserAction::OpenFilePicker);
    }
}
