//! Refresh and interaction flows of DriveClient against a mocked front end.

use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;
use web_drive::render::{CARD_CLASS, EMPTY_PLACEHOLDER, LISTING_ERROR};
use web_drive::{
    Anchor, BrowserAction, DriveClient, EventKind, Fetcher, RecordingBrowser, RefreshOutcome,
    UiEvent, UploadBlob,
};

fn client_for(server: &ServerGuard) -> DriveClient<RecordingBrowser> {
    let fetcher = Fetcher::new(&server.url()).unwrap();
    DriveClient::new(fetcher, RecordingBrowser::new())
}

fn card_count(client: &DriveClient<RecordingBrowser>) -> usize {
    client
        .page()
        .files_grid()
        .inner_html()
        .matches(&format!(r#"class="{CARD_CLASS}""#))
        .count()
}

/// Listing endpoint answering with `files`; not yet created.
fn listing_mock(server: &mut ServerGuard, files: serde_json::Value) -> Mock {
    server
        .mock("GET", "/web/api/drive")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "folders": [], "files": files }).to_string())
}

fn usage_mock(server: &mut ServerGuard, used: u64, quota: u64) -> Mock {
    server
        .mock("GET", "/web/api/usage")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "used_bytes": used, "quota_bytes": quota }).to_string())
}

fn file(id: u64, name: &str, size: u64) -> serde_json::Value {
    json!({
        "id": id,
        "original_name": name,
        "size": size,
        "mime_type": "application/octet-stream",
        "created_at": "2024-06-01T12:00:00",
        "download_count": 0
    })
}

mod refresh {
    use super::*;

    #[tokio::test]
    async fn test_page_ready_renders_listing_and_usage() {
        let mut server = Server::new_async().await;
        let listing = listing_mock(
            &mut server,
            json!([file(1, "a.txt", 1048576), file(2, "b.txt", 3145728)]),
        )
        .create_async()
        .await;
        let usage = usage_mock(&mut server, 1_500_000_000, 2_000_000_000).create_async().await;

        let mut client = client_for(&server);
        assert_eq!(client.on_page_ready().await, RefreshOutcome::Rendered);

        listing.assert_async().await;
        usage.assert_async().await;
        assert_eq!(card_count(&client), 2);
        let grid = client.page().files_grid().inner_html();
        assert!(grid.contains("1.00 MB"));
        assert!(grid.contains("3.00 MB"));
        let usage_html = client.page().usage().inner_html();
        assert!(usage_html.contains("(75%)"));
        assert!(usage_html.contains("width: 75%"));
    }

    #[tokio::test]
    async fn test_empty_listing_shows_placeholder() {
        let mut server = Server::new_async().await;
        listing_mock(&mut server, json!([])).create_async().await;
        usage_mock(&mut server, 0, 0).create_async().await;

        let mut client = client_for(&server);
        client.refresh().await;

        assert!(client.page().files_grid().inner_html().contains(EMPTY_PLACEHOLDER));
        assert_eq!(card_count(&client), 0);
        assert!(client.page().usage().inner_html().contains("(0%)"));
    }

    #[tokio::test]
    async fn test_listing_401_redirects_without_rendering() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/web/api/drive")
            .with_status(401)
            .create_async()
            .await;
        let usage = server
            .mock("GET", "/web/api/usage")
            .expect(0)
            .create_async()
            .await;

        let mut client = client_for(&server);
        assert_eq!(client.refresh().await, RefreshOutcome::Redirected);

        usage.assert_async().await;
        assert_eq!(
            client.browser().actions(),
            [BrowserAction::Navigate(format!("{}/login", server.url()))]
        );
        assert_eq!(client.page().files_grid().inner_html(), "");
        assert_eq!(client.page().usage().inner_html(), "");
    }

    #[tokio::test]
    async fn test_listing_500_shows_error_text_only() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/web/api/drive")
            .with_status(500)
            .create_async()
            .await;
        usage_mock(&mut server, 10, 100).create_async().await;

        let mut client = client_for(&server);
        assert_eq!(client.refresh().await, RefreshOutcome::ListingFailed);

        assert_eq!(client.page().files_grid().inner_html(), LISTING_ERROR);
        assert!(client.page().usage().inner_html().contains("(10%)"));
    }

    #[tokio::test]
    async fn test_usage_failure_leaves_listing_intact() {
        let mut server = Server::new_async().await;
        listing_mock(&mut server, json!([file(4, "kept.txt", 1)])).create_async().await;
        server
            .mock("GET", "/web/api/usage")
            .with_status(500)
            .create_async()
            .await;

        let mut client = client_for(&server);
        assert_eq!(client.refresh().await, RefreshOutcome::Rendered);

        assert_eq!(card_count(&client), 1);
        assert_eq!(client.page().usage().inner_html(), "");
        assert!(client.browser().actions().is_empty());
    }

    #[tokio::test]
    async fn test_unnamed_file_still_renders() {
        let mut server = Server::new_async().await;
        listing_mock(
            &mut server,
            json!([{ "id": 6, "original_name": null, "size": 2048, "created_at": "2024-06-01T12:00:00" }]),
        )
        .create_async()
        .await;
        usage_mock(&mut server, 1, 10).create_async().await;

        let mut client = client_for(&server);
        assert_eq!(client.refresh().await, RefreshOutcome::Rendered);

        assert_eq!(card_count(&client), 1);
        assert_ne!(client.page().files_grid().inner_html(), LISTING_ERROR);
    }

    #[tokio::test]
    async fn test_refresh_button_reloads() {
        let mut server = Server::new_async().await;
        let listing = listing_mock(&mut server, json!([file(1, "a", 1)]))
            .expect(2)
            .create_async()
            .await;
        usage_mock(&mut server, 1, 1).create_async().await;

        let mut client = client_for(&server);
        client.on_page_ready().await;
        let outcome = client.dispatch(UiEvent::click(Anchor::RefreshButton)).await;

        assert!(outcome.handled);
        listing.assert_async().await;
        assert_eq!(card_count(&client), 1);
    }
}

mod upload {
    use super::*;

    #[tokio::test]
    async fn test_successful_upload_refreshes_once() {
        let mut server = Server::new_async().await;
        let upload = server
            .mock("POST", "/web/api/upload")
            .match_body(Matcher::Regex(r#"name="upload"; filename="new.txt""#.to_string()))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;
        let listing = listing_mock(&mut server, json!([file(9, "new.txt", 5)]))
            .expect(1)
            .create_async()
            .await;
        usage_mock(&mut server, 5, 100).create_async().await;

        let mut client = client_for(&server);
        let outcome = client
            .dispatch(UiEvent::select_files(vec![UploadBlob::new("new.txt", b"hello".to_vec())]))
            .await;

        assert!(outcome.handled);
        upload.assert_async().await;
        listing.assert_async().await;
        assert_eq!(card_count(&client), 1);
        assert!(client.browser().alerts().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_upload_alerts_and_skips_refresh() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/web/api/upload")
            .with_status(400)
            .with_body("file too large")
            .create_async()
            .await;
        let listing = server
            .mock("GET", "/web/api/drive")
            .expect(0)
            .create_async()
            .await;

        let mut client = client_for(&server);
        client
            .dispatch(UiEvent::select_files(vec![UploadBlob::new("big.iso", vec![0u8; 8])]))
            .await;

        listing.assert_async().await;
        assert_eq!(client.browser().alerts(), vec!["file too large"]);
    }

    #[tokio::test]
    async fn test_accepted_upload_reports_failed_refresh() {
        let mut server = Server::new_async().await;
        let upload = server
            .mock("POST", "/web/api/upload")
            .match_body(Matcher::Regex(r#"name="folder_id"\r?\n\r?\n2\r?\n"#.to_string()))
            .with_status(200)
            .create_async()
            .await;
        server
            .mock("GET", "/web/api/drive")
            .with_status(500)
            .create_async()
            .await;
        usage_mock(&mut server, 1, 10).create_async().await;

        let mut client = client_for(&server);
        let outcome = client
            .upload_then_refresh(&UploadBlob::new("a.txt", b"a".to_vec()), Some("2"))
            .await;

        upload.assert_async().await;
        assert_eq!(outcome, Some(RefreshOutcome::ListingFailed));
        assert_eq!(client.page().files_grid().inner_html(), LISTING_ERROR);
        assert!(client.browser().alerts().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_upload_yields_no_outcome() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/web/api/upload")
            .with_status(413)
            .with_body("quota exceeded")
            .create_async()
            .await;

        let mut client = client_for(&server);
        let outcome = client
            .upload_then_refresh(&UploadBlob::new("a.txt", b"a".to_vec()), None)
            .await;

        assert_eq!(outcome, None);
        assert_eq!(client.browser().alerts(), vec!["quota exceeded"]);
    }

    #[tokio::test]
    async fn test_drop_uploads_first_file_only() {
        let mut server = Server::new_async().await;
        let first = server
            .mock("POST", "/web/api/upload")
            .match_body(Matcher::Regex(r#"filename="first.txt""#.to_string()))
            .with_status(200)
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("POST", "/web/api/upload")
            .match_body(Matcher::Regex(r#"filename="second.txt""#.to_string()))
            .with_status(200)
            .expect(0)
            .create_async()
            .await;
        listing_mock(&mut server, json!([file(1, "first.txt", 1)])).create_async().await;
        usage_mock(&mut server, 1, 10).create_async().await;

        let mut client = client_for(&server);
        client
            .dispatch(UiEvent::new(Anchor::Dropzone, EventKind::DragOver))
            .await;
        let outcome = client
            .dispatch(UiEvent::drop_files(vec![
                UploadBlob::new("first.txt", b"1".to_vec()),
                UploadBlob::new("second.txt", b"2".to_vec()),
            ]))
            .await;

        assert!(outcome.default_prevented);
        first.assert_async().await;
        second.assert_async().await;
        assert!(!client.page().dropzone().has_class("dragover"));
        assert_eq!(card_count(&client), 1);
    }

    #[tokio::test]
    async fn test_change_without_file_does_nothing() {
        let mut server = Server::new_async().await;
        let upload = server
            .mock("POST", "/web/api/upload")
            .expect(0)
            .create_async()
            .await;

        let mut client = client_for(&server);
        let outcome = client.dispatch(UiEvent::select_files(Vec::new())).await;

        assert!(outcome.handled);
        upload.assert_async().await;
    }
}

mod download {
    use super::*;

    #[tokio::test]
    async fn test_card_download_opens_file_endpoint() {
        let mut server = Server::new_async().await;
        listing_mock(&mut server, json!([file(7, "a", 1), file(8, "b", 2)]))
            .create_async()
            .await;
        usage_mock(&mut server, 1, 10).create_async().await;

        let mut client = client_for(&server);
        client.refresh().await;

        assert!(client.click_download(1));
        assert!(!client.click_download(2));
        assert_eq!(
            client.browser().actions(),
            [BrowserAction::OpenTab(format!(
                "{}/web/api/files/8/download",
                server.url()
            ))]
        );
    }

    #[tokio::test]
    async fn test_delete_then_refresh() {
        let mut server = Server::new_async().await;
        let delete = server
            .mock("DELETE", "/web/api/files/7")
            .with_status(204)
            .create_async()
            .await;
        listing_mock(&mut server, json!([])).create_async().await;
        usage_mock(&mut server, 0, 10).create_async().await;

        let mut client = client_for(&server);
        assert_eq!(client.delete("7").await.unwrap(), RefreshOutcome::Rendered);

        delete.assert_async().await;
        assert!(client.page().files_grid().inner_html().contains(EMPTY_PLACEHOLDER));
    }
}
