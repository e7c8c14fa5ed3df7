mod helpers;

use axum::{body::Bytes, http::StatusCode};
use chrono::Utc;
use helpers::fixtures::{AttachmentFixture, seed_attachment, seed_tenant, write_upload};
use helpers::{TestApp, admin_auth, setup_test_app};
use network_inventory::models::tenant::Tenant;
use serde_json::{Value, json};
use std::{future::IntoFuture, time::Duration};
use tokio::time::timeout;

fn alpha_tenant() -> Tenant {
    Tenant {
        id: 2,
        name: "Alpha Site".into(),
        domain: "example.org".into(),
        path: "/alpha/".into(),
    }
}

async fn seed_alpha(app: &TestApp) {
    seed_tenant(app, 1, "Main Site", "example.org", "/").await;
    seed_tenant(app, 2, "Alpha Site", "example.org", "/alpha/").await;

    write_upload(app, 2, "2024/01/small-report.pdf", 500);
    write_upload(app, 2, "2024/02/annual-report.pdf", 2_000_000);

    seed_attachment(
        app,
        AttachmentFixture {
            id: 10,
            tenant_id: 2,
            mime_type: "application/pdf",
            uploaded_at: "2024-01-15 09:30:00",
            attached_file: Some("2024/01/small-report.pdf"),
            guid: None,
        },
    )
    .await;
    seed_attachment(
        app,
        AttachmentFixture {
            id: 11,
            tenant_id: 2,
            mime_type: "application/pdf",
            uploaded_at: "2024-02-20 14:00:00",
            attached_file: Some("2024/02/annual-report.pdf"),
            guid: None,
        },
    )
    .await;
    // other types and other tenants are never listed
    seed_attachment(
        app,
        AttachmentFixture {
            id: 12,
            tenant_id: 2,
            mime_type: "image/jpeg",
            uploaded_at: "2024-03-01 08:00:00",
            attached_file: Some("2024/03/photo.jpg"),
            guid: None,
        },
    )
    .await;
    seed_attachment(
        app,
        AttachmentFixture {
            id: 13,
            tenant_id: 1,
            mime_type: "application/pdf",
            uploaded_at: "2024-03-02 08:00:00",
            attached_file: Some("2024/03/main.pdf"),
            guid: None,
        },
    )
    .await;
}

#[tokio::test]
async fn test_list_inventory_for_tenant() {
    let app = setup_test_app().await;
    seed_alpha(&app).await;

    let response = app
        .client()
        .post("/inventory/list")
        .add_header("Authorization", admin_auth())
        .json(&json!({ "tenantId": 2 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["tenantId"], 2);
    assert_eq!(body["count"], 2);

    let pdfs = body["pdfs"].as_array().expect("pdfs should be an array");
    assert_eq!(pdfs.len(), 2);

    // newest upload first
    assert_eq!(pdfs[0]["id"], 11);
    assert_eq!(pdfs[0]["filename"], "annual-report.pdf");
    assert_eq!(pdfs[0]["fileSize"], "1.91 MB");
    assert_eq!(pdfs[0]["fileSizeRaw"], 2_000_000);
    assert_eq!(pdfs[0]["uploadDate"], "2024-02-20 14:00:00");
    assert_eq!(
        pdfs[0]["url"],
        "https://example.org/alpha/wp-content/uploads/sites/2/2024/02/annual-report.pdf"
    );

    assert_eq!(pdfs[1]["filename"], "small-report.pdf");
    assert_eq!(pdfs[1]["fileSize"], "500 B");
    assert_eq!(pdfs[1]["fileSizeRaw"], 500);

    assert_eq!(app.state.inventory.context().current(), 1);
}

#[tokio::test]
async fn test_export_inventory_as_csv() {
    let app = setup_test_app().await;
    seed_alpha(&app).await;

    let response = app
        .client()
        .post("/inventory/export")
        .add_header("Authorization", admin_auth())
        .json(&json!({ "tenantId": "2" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();

    let expected_name = format!(
        "Alpha Site - WordPress PDF listing - {}.csv",
        Utc::now().format("%Y-%m-%d")
    );
    assert_eq!(body["filename"], expected_name.as_str());

    let content = body["content"].as_str().expect("content should be text");
    let table = content
        .strip_prefix('\u{feff}')
        .expect("export should start with a byte-order mark");

    let records: Vec<csv::StringRecord> = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(table.as_bytes())
        .records()
        .collect::<Result<_, _>>()
        .expect("export should be valid CSV");

    assert_eq!(records.len(), 3);
    assert_eq!(
        records[0].iter().collect::<Vec<_>>(),
        ["Filename", "Direct Link", "Upload Date", "File Size"]
    );
    for record in &records[1..] {
        assert_eq!(record.len(), 4);
        assert!(record[1].starts_with("https://example.org/alpha/"));
    }
    assert_eq!(&records[1][0], "annual-report.pdf");
    assert_eq!(&records[1][3], "1.91 MB");
    assert_eq!(&records[2][2], "2024-01-15 09:30:00");
    assert_eq!(&records[2][3], "500 B");
}

#[tokio::test]
async fn test_missing_files_degrade_to_sentinel_rows() {
    let app = setup_test_app().await;
    seed_tenant(&app, 3, "Beta", "beta.example.org", "/").await;

    seed_attachment(
        &app,
        AttachmentFixture {
            id: 20,
            tenant_id: 3,
            mime_type: "APPLICATION/PDF",
            uploaded_at: "2023-05-05 05:05:05",
            attached_file: Some("2023/05/vanished.pdf"),
            guid: None,
        },
    )
    .await;
    seed_attachment(
        &app,
        AttachmentFixture {
            id: 21,
            tenant_id: 3,
            mime_type: "application/pdf",
            uploaded_at: "2023-04-04 04:04:04",
            attached_file: None,
            guid: Some("https://beta.example.org/files/orphan.pdf"),
        },
    )
    .await;

    let response = app
        .client()
        .post("/inventory/list")
        .add_header("Authorization", admin_auth())
        .json(&json!({ "tenantId": 3 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["count"], 2);

    let pdfs = body["pdfs"].as_array().unwrap();
    assert_eq!(pdfs[0]["filename"], "vanished.pdf");
    assert_eq!(pdfs[0]["fileSize"], "Missing file");
    assert_eq!(pdfs[0]["fileSizeRaw"], 0);
    assert_eq!(
        pdfs[0]["url"],
        "https://beta.example.org/wp-content/uploads/sites/3/2023/05/vanished.pdf"
    );

    assert_eq!(pdfs[1]["filename"], "orphan.pdf");
    assert_eq!(pdfs[1]["fileSize"], "Missing file");
    assert_eq!(pdfs[1]["url"], "https://beta.example.org/files/orphan.pdf");
}

#[tokio::test]
async fn test_tenant_without_documents_returns_empty_list() {
    let app = setup_test_app().await;
    seed_tenant(&app, 4, "Empty", "example.org", "/empty/").await;

    let response = app
        .client()
        .post("/inventory/list")
        .add_header("Authorization", admin_auth())
        .json(&json!({ "tenantId": 4 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["count"], 0);
    assert_eq!(body["pdfs"], json!([]));

    let export = app
        .client()
        .post("/inventory/export")
        .add_header("Authorization", admin_auth())
        .json(&json!({ "tenantId": 4 }))
        .await;
    assert_eq!(export.status_code(), StatusCode::OK);
    let body: Value = export.json();
    assert_eq!(
        body["content"],
        "\u{feff}Filename,Direct Link,Upload Date,File Size\n"
    );
}

#[tokio::test]
async fn test_unauthorized_callers_are_rejected() {
    let app = setup_test_app().await;
    seed_alpha(&app).await;

    for path in ["/inventory/list", "/inventory/export"] {
        let anonymous = app
            .client()
            .post(path)
            .json(&json!({ "tenantId": 2 }))
            .await;
        assert_eq!(anonymous.status_code(), StatusCode::FORBIDDEN);
        let body: Value = anonymous.json();
        assert_eq!(body["message"], "Permission denied");

        let wrong_token = app
            .client()
            .post(path)
            .add_header("Authorization", "Bearer not-the-token")
            .json(&json!({ "tenantId": 2 }))
            .await;
        assert_eq!(wrong_token.status_code(), StatusCode::FORBIDDEN);

        // authorization is checked before input validation
        let invalid = app.client().post(path).json(&json!({})).await;
        assert_eq!(invalid.status_code(), StatusCode::FORBIDDEN);
    }

    for path in ["/", "/tenants"] {
        let response = app.client().get(path).await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    }

    assert_eq!(app.state.inventory.context().current(), 1);
}

#[tokio::test]
async fn test_denied_requests_never_wait_for_the_tenant_context() {
    let app = setup_test_app().await;
    seed_alpha(&app).await;

    // hold the context as a running scan would; any switch attempt would block
    let context = app.state.inventory.context();
    let scope = context.enter(alpha_tenant()).await;

    for path in ["/inventory/list", "/inventory/export"] {
        let denied = timeout(
            Duration::from_secs(2),
            app.client().post(path).json(&json!({ "tenantId": 2 })).into_future(),
        )
        .await
        .expect("denied request must not wait for the switch lock");
        assert_eq!(denied.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(context.current(), 2);
    }

    drop(scope);
    assert_eq!(context.current(), 1);
}

#[tokio::test]
async fn test_invalid_tenant_ids_are_rejected() {
    let app = setup_test_app().await;
    seed_alpha(&app).await;

    for path in ["/inventory/list", "/inventory/export"] {
        let missing = app
            .client()
            .post(path)
            .add_header("Authorization", admin_auth())
            .json(&json!({}))
            .await;
        assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = missing.json();
        assert_eq!(body["message"], "Tenant ID not provided");

        let no_body = app
            .client()
            .post(path)
            .add_header("Authorization", admin_auth())
            .await;
        assert_eq!(no_body.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = no_body.json();
        assert_eq!(body["message"], "Tenant ID not provided");

        for raw in ["", "null"] {
            let response = app
                .client()
                .post(path)
                .add_header("Authorization", admin_auth())
                .add_header("Content-Type", "application/json")
                .bytes(Bytes::from_static(raw.as_bytes()))
                .await;
            assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
            let body: Value = response.json();
            assert_eq!(body["message"], "Tenant ID not provided", "body {raw:?}");
        }

        for bad in [json!(0), json!(-2), json!("abc")] {
            let response = app
                .client()
                .post(path)
                .add_header("Authorization", admin_auth())
                .json(&json!({ "tenantId": bad }))
                .await;
            assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
            let body: Value = response.json();
            assert_eq!(body["message"], "Invalid tenant ID");
        }

        let unknown = app
            .client()
            .post(path)
            .add_header("Authorization", admin_auth())
            .json(&json!({ "tenantId": 999 }))
            .await;
        assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
        let body: Value = unknown.json();
        assert_eq!(body["message"], "Invalid tenant.");
        assert_eq!(body["status"], 404);
    }

    assert_eq!(app.state.inventory.context().current(), 1);
}

#[tokio::test]
async fn test_concurrent_scans_stay_within_their_tenant() {
    let app = setup_test_app().await;
    seed_alpha(&app).await;
    write_upload(&app, 1, "2024/03/main.pdf", 1536);

    let alpha = app
        .client()
        .post("/inventory/list")
        .add_header("Authorization", admin_auth())
        .json(&json!({ "tenantId": 2 }));
    let home = app
        .client()
        .post("/inventory/list")
        .add_header("Authorization", admin_auth())
        .json(&json!({ "tenantId": 1 }));

    let (alpha, home) = tokio::join!(async { alpha.await }, async { home.await });

    let alpha: Value = alpha.json();
    let main: Value = home.json();
    assert_eq!(alpha["count"], 2);
    assert_eq!(main["count"], 1);
    assert_eq!(main["pdfs"][0]["filename"], "main.pdf");
    assert_eq!(main["pdfs"][0]["fileSize"], "1.5 KB");
    assert_eq!(
        main["pdfs"][0]["url"],
        "https://example.org/wp-content/uploads/2024/03/main.pdf"
    );

    assert_eq!(app.state.inventory.context().current(), 1);
}

#[tokio::test]
async fn test_tenant_directory_and_admin_page() {
    let app = setup_test_app().await;
    seed_tenant(&app, 2, "R&D <Labs>", "example.org", "/rd/").await;
    seed_tenant(&app, 1, "Main Site", "example.org", "/").await;

    let response = app
        .client()
        .get("/tenants")
        .add_header("Authorization", admin_auth())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["count"], 2);
    assert_eq!(body["tenants"][0]["id"], 1);
    assert_eq!(body["tenants"][1]["name"], "R&D <Labs>");
    assert_eq!(body["tenants"][1]["path"], "/rd/");

    let page = app
        .client()
        .get("/")
        .add_header("Authorization", admin_auth())
        .await;
    assert_eq!(page.status_code(), StatusCode::OK);
    let html = page.text();
    assert!(html.contains("R&amp;D &lt;Labs&gt;"));
    assert!(html.contains(r#"data-tenant-id="2""#));
    assert!(html.contains("example.org/rd/"));
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = setup_test_app().await;

    let live = app.client().get("/healthz").await;
    assert_eq!(live.status_code(), StatusCode::OK);
    let body: Value = live.json();
    assert_eq!(body["status"], "ok");

    let ready = app.client().get("/readyz").await;
    assert_eq!(ready.status_code(), StatusCode::OK);
    let body: Value = ready.json();
    assert_eq!(body["checks"]["sqlite"]["ok"], true);
    assert_eq!(body["checks"]["uploads"]["ok"], true);
}
