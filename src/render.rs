//! Turns fetched listing and usage data into anchor element markup.

use tracing::error;

use crate::error::DriveError;
use crate::models::{format_gigabytes, format_megabytes, format_timestamp, FileEntry, UsageInfo};
use crate::page::{Anchor, Page};
use crate::sanitize::escape_html;

/// Grid content when the listing is empty.
pub const EMPTY_PLACEHOLDER: &str = "No files yet";

/// Grid content when the listing could not be loaded.
pub const LISTING_ERROR: &str = "Error loading files";

/// Class marking one file card in the grid.
pub const CARD_CLASS: &str = "file-card";

/// Replace the file grid with one card per entry.
///
/// Each card's download button is bound to the entry's id; the binding
/// index is carried in the button's `data-binding` attribute.
pub fn render_files(page: &mut Page, files: &[FileEntry]) {
    let grid = page.element_mut(Anchor::FilesGrid);
    grid.clear();

    if files.is_empty() {
        grid.set_inner_html(format!(r#"<div class="empty">{EMPTY_PLACEHOLDER}</div>"#));
        return;
    }

    for entry in files {
        let binding = grid.bind_download(entry.id.clone());
        let name = escape_html(entry.original_name.as_deref());
        let card = format!(
            concat!(
                r#"<div class="{card}" data-id="{id}">"#,
                r#"<div class="file-name truncate" title="{name}">{name}</div>"#,
                r#"<div class="file-size">{size} MB</div>"#,
                r#"<button class="download-btn" data-binding="{binding}">Download</button>"#,
                r#"<div class="file-date">{date}</div>"#,
                "</div>"
            ),
            card = CARD_CLASS,
            id = escape_html(Some(entry.id.as_str())),
            name = name,
            size = format_megabytes(entry.size),
            binding = binding,
            date = escape_html(Some(format_timestamp(&entry.created_at).as_str())),
        );
        grid.append_html(&card);
    }
}

/// Replace the whole grid with the listing error text and log the cause.
pub fn render_listing_error(page: &mut Page, err: &DriveError) {
    error!(error = %err, "failed to load drive listing");
    page.element_mut(Anchor::FilesGrid).set_inner_html(LISTING_ERROR);
}

/// Used share of the quota in whole percent. Not clamped.
///
/// A zero quota divides by 1.
pub fn usage_percent(usage: &UsageInfo) -> u64 {
    let quota = usage.quota_bytes.max(1) as f64;
    (usage.used_bytes as f64 / quota * 100.0).round() as u64
}

/// Filled width of the usage bar, capped at 100.
pub fn bar_width(percent: u64) -> u64 {
    percent.min(100)
}

/// Render the usage summary and the proportional bar.
pub fn render_usage(page: &mut Page, usage: &UsageInfo) {
    let percent = usage_percent(usage);
    let html = format!(
        concat!(
            r#"<div class="usage-text">{used} MB used of {quota} GB ({percent}%)</div>"#,
            r#"<div class="usage-bar"><div class="usage-fill" style="width: {width}%"></div></div>"#
        ),
        used = format_megabytes(usage.used_bytes),
        quota = format_gigabytes(usage.quota_bytes),
        percent = percent,
        width = bar_width(percent),
    );
    page.element_mut(Anchor::Usage).set_inner_html(html);
}
