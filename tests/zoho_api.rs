use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_string, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zoho_sheet::models::{DeletedRows, WorkbookListOptions, WorksheetRecordDeletion};
use zoho_sheet::zoho::ReqwestTransport;
use zoho_sheet::{Credentials, SheetClient, SheetError, SheetOperations, TokenAuthority};

fn credentials(server: &MockServer) -> Credentials {
    Credentials::new("1000.CLIENT", "secret")
        .with_endpoints(server.uri(), format!("{}/api/v2", server.uri()))
}

fn authority(credentials: Credentials) -> Arc<TokenAuthority> {
    let transport = Arc::new(ReqwestTransport::new().unwrap());
    Arc::new(TokenAuthority::new(credentials, transport))
}

async fn mount_refresh(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth/v2/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=1000.refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "1000.access",
            "expires_in": 3600,
            "api_domain": "https://www.zohoapis.com",
            "token_type": "Bearer"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_token_refreshed_once_and_reused() {
    let server = MockServer::start().await;
    mount_refresh(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/api/v2/wb1"))
        .and(query_param("method", "table.list"))
        .and(header("authorization", "Zoho-oauthtoken 1000.access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tables": [{
                "table_name": "Orders",
                "table_id": 1,
                "start_row": 1,
                "start_column": 1,
                "end_row": 12,
                "end_column": 4
            }],
            "status": "success"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = SheetClient::from_authority(authority(
        credentials(&server).with_refresh_token("1000.refresh"),
    ))
    .unwrap();

    let first = client.list_tables("wb1").await.unwrap();
    let second = client.list_tables("wb1").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].table_name, "Orders");
}

#[tokio::test]
async fn test_workbook_list_form_body() {
    let server = MockServer::start().await;
    mount_refresh(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/api/v2/workbooks"))
        .and(query_param("method", "workbook.list"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string(
            "start_index=1&count=50&sort_option=recently_modified",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "workbooks": [
                {"resource_id": "wb1", "workbook_name": "Budget"},
                {"resource_id": "wb2", "workbook_name": "Inventory"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SheetClient::from_authority(authority(
        credentials(&server).with_refresh_token("1000.refresh"),
    ))
    .unwrap();

    let workbooks = client
        .list_workbooks(&WorkbookListOptions::default())
        .await
        .unwrap();

    assert_eq!(workbooks.len(), 2);
    assert_eq!(workbooks[1].name, "Inventory");
    assert!(workbooks[1].url.is_none());
    assert!(workbooks[1].created_time.is_none());
}

#[tokio::test]
async fn test_remote_error_keeps_status_and_body() {
    let server = MockServer::start().await;
    mount_refresh(&server, 1).await;

    let error_body = r#"{"error_code":2872,"error_message":"Worksheet does not exist"}"#;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/workbooks/wb1/sheets/s9/rows/4"))
        .respond_with(ResponseTemplate::new(400).set_body_string(error_body))
        .expect(1)
        .mount(&server)
        .await;

    let client = SheetClient::from_authority(authority(
        credentials(&server).with_refresh_token("1000.refresh"),
    ))
    .unwrap();

    let err = client.delete_row("wb1", "s9", 4).await.unwrap_err();
    match err {
        SheetError::RemoteApi { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, error_body);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_rejected_refresh_sends_no_api_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/v2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "invalid_code"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/api/v2/wb1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = SheetClient::from_authority(authority(
        credentials(&server).with_refresh_token("1000.refresh"),
    ))
    .unwrap();

    let err = client.list_tables("wb1").await.unwrap_err();
    assert!(matches!(err, SheetError::AuthExchange { status: 200, .. }));
}

#[tokio::test]
async fn test_device_flow_captures_refresh_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/v3/device/code"))
        .and(body_string_contains("grant_type=device_request"))
        .and(body_string_contains("access_type=offline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user_code": "ABCD-1234",
            "device_code": "1004.device",
            "interval": 5,
            "expires_in": 300,
            "verification_url": "https://accounts.zoho.com/oauth/v3/device"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/v3/device/token"))
        .and(body_string_contains("grant_type=device_token"))
        .and(body_string_contains("code=1004.device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "1000.first",
            "refresh_token": "1000.captured",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let authority = authority(credentials(&server));
    let device = authority.begin_device_authorization().await.unwrap();
    assert_eq!(device.user_code, "ABCD-1234");
    assert_eq!(device.interval, 5);
    assert!(authority.get_refresh_token().is_none());

    authority.use_device_code(device.device_code);
    assert_eq!(authority.get_access_token().await.unwrap(), "1000.first");
    assert_eq!(authority.get_refresh_token().as_deref(), Some("1000.captured"));

    // Cached: the device token mock expects exactly one call.
    assert_eq!(authority.get_access_token().await.unwrap(), "1000.first");
}

#[tokio::test]
async fn test_worksheet_records_delete_counts() {
    let server = MockServer::start().await;
    mount_refresh(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/api/v2/wb1"))
        .and(query_param("method", "worksheet.records.delete"))
        .and(body_string_contains("worksheet_name=Sheet1"))
        .and(body_string_contains("delete_rows=true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "no_of_rows_deleted": 3,
            "no_of_rows_remaining": 7,
            "status": "success"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SheetClient::from_authority(authority(
        credentials(&server).with_refresh_token("1000.refresh"),
    ))
    .unwrap();

    let deletion = WorksheetRecordDeletion {
        criteria: Some(r#""Month"="March""#.to_string()),
        ..Default::default()
    };
    let counts = client
        .delete_worksheet_records("wb1", "Sheet1", &deletion)
        .await
        .unwrap();

    assert_eq!(
        counts,
        DeletedRows {
            deleted: 3,
            remaining: 7
        }
    );
}

#[tokio::test]
async fn test_hash_sheet_id_reaches_columns_endpoint() {
    let server = MockServer::start().await;
    mount_refresh(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/api/v2/workbooks/wb1/sheets/1%23/columns"))
        .and(body_string(r#"{"columns":["Phone"]}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = SheetClient::from_authority(authority(
        credentials(&server).with_refresh_token("1000.refresh"),
    ))
    .unwrap();

    client
        .add_columns("wb1", "1#", &["Phone".to_string()])
        .await
        .unwrap();
}
