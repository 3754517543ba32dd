use super::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn error_message_extraction_prefers_google_shape() {
    let body = json!({
        "error": { "code": 403, "message": "The caller does not have permission" }
    })
    .to_string();
    let msg = extract_error_message(&body, StatusCode::FORBIDDEN);
    assert!(msg.contains("403"));
    assert!(msg.contains("does not have permission"));
}

#[test]
fn error_message_falls_back_to_status() {
    let msg = extract_error_message("<html>nope</html>", StatusCode::BAD_GATEWAY);
    assert_eq!(msg, "HTTP 502 error");
}

#[tokio::test]
async fn upstream_status_is_preserved_on_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "code": 401, "message": "Invalid Credentials" }
        })))
        .mount(&server)
        .await;

    let client = GoogleClient::new(reqwest::Client::new(), "bad-token");
    let err = client.get(&server.uri(), &[]).await.unwrap_err();
    assert!(err.is_upstream_auth_failure());
}

#[tokio::test]
async fn sheets_append_targets_append_range_with_raw_input() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sheet-1/values/Sheet1!A1:append"))
        .and(query_param("valueInputOption", "RAW"))
        .and(body_json(json!({ "values": [["Alice", "a@x.com"]] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"updates": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let sheets = SheetsApi::new(reqwest::Client::new(), server.uri(), "tok");
    sheets
        .append_row("sheet-1", &[json!("Alice"), json!("a@x.com")])
        .await
        .unwrap();
}

#[tokio::test]
async fn sheets_update_writes_one_based_row() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v4/spreadsheets/sheet-1/values/Sheet1!A3"))
        .and(query_param("valueInputOption", "RAW"))
        .and(body_json(json!({ "values": [["Bob", "b@x.com"]] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let sheets = SheetsApi::new(reqwest::Client::new(), server.uri(), "tok");
    sheets
        .update_row("sheet-1", 2, &[json!("Bob"), json!("b@x.com")])
        .await
        .unwrap();
}

#[tokio::test]
async fn sheets_delete_targets_single_row_dimension() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sheet-1:batchUpdate"))
        .and(body_json(json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": 0,
                        "dimension": "ROWS",
                        "startIndex": 2,
                        "endIndex": 3,
                    }
                }
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let sheets = SheetsApi::new(reqwest::Client::new(), server.uri(), "tok");
    sheets.delete_row("sheet-1", 2).await.unwrap();
}

#[tokio::test]
async fn sheets_get_values_handles_missing_grid() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-1/values/Sheet1!A1:B1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"range": "Sheet1!A1:B1000"})))
        .mount(&server)
        .await;

    let sheets = SheetsApi::new(reqwest::Client::new(), server.uri(), "tok");
    let rows = sheets.get_values("sheet-1", "Sheet1!A1:B1000").await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn gmail_search_flattens_metadata_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages"))
        .and(query_param("q", "from:alice"))
        .and(query_param("maxResults", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [{ "id": "m1", "threadId": "t1" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages/m1"))
        .and(query_param("format", "metadata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "m1",
            "snippet": "Hi there",
            "payload": {
                "headers": [
                    { "name": "From", "value": "alice@example.com" },
                    { "name": "Subject", "value": "Hello" },
                    { "name": "Date", "value": "Thu, 1 Jan 2026 00:00:00 +0000" },
                    { "name": "X-Ignored", "value": "nope" }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gmail = GmailApi::new(reqwest::Client::new(), server.uri(), "tok");
    let records = gmail.search(Some("from:alice")).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], "m1");
    assert_eq!(records[0]["fields"]["From"], "alice@example.com");
    assert_eq!(records[0]["fields"]["Subject"], "Hello");
    assert_eq!(records[0]["fields"]["Snippet"], "Hi there");
    assert!(records[0]["fields"].get("X-Ignored").is_none());
}

#[tokio::test]
async fn gmail_search_with_no_matches_returns_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"resultSizeEstimate": 0})))
        .mount(&server)
        .await;

    let gmail = GmailApi::new(reqwest::Client::new(), server.uri(), "tok");
    let records = gmail.search(Some("from:nobody")).await.unwrap();
    assert!(records.is_empty());
}
