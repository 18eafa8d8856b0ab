//! End-to-end gateway tests
//!
//! Each test runs a real server on an ephemeral port.

use anyhow::Result;
use integration_tests::helpers::{chat_body, TestServer};
use livechat_common::{Aes128Cipher, AppConfig};
use serde_json::json;

#[tokio::test]
async fn health_endpoint_returns_ok() -> Result<()> {
    let server = TestServer::start().await?;
    let response = server
        .client
        .get(format!("{}/health", server.base_url()))
        .send()
        .await?;

    assert!(response.status().is_success());
    assert_eq!(response.text().await?, "OK");
    Ok(())
}

#[tokio::test]
async fn publish_fans_out_to_room_subscribers() -> Result<()> {
    let server = TestServer::start().await?;
    let mut a = server.ws_client().await?;
    let mut b = server.ws_client().await?;

    a.subscribe("r1").await?;
    b.subscribe("r1").await?;

    a.publish("r1", "A", "hi").await?;

    let frame = b.recv_frame().await?;
    assert_eq!(frame["destination"], "/sub/r1");
    let body = chat_body(&frame)?;
    assert_eq!(body["sender"], "A");
    assert_eq!(body["content"], "hi");

    // Delivery is by membership alone, so the publisher hears its own echo
    let echo = chat_body(&a.recv_frame().await?)?;
    assert_eq!(echo["content"], "hi");
    Ok(())
}

#[tokio::test]
async fn subscribers_of_other_rooms_hear_nothing() -> Result<()> {
    let server = TestServer::start().await?;
    let mut a = server.ws_client().await?;
    let mut b = server.ws_client().await?;

    a.subscribe("r1").await?;
    b.subscribe("r2").await?;

    a.publish("r1", "A", "only r1").await?;

    let echo = chat_body(&a.recv_frame().await?)?;
    assert_eq!(echo["content"], "only r1");
    b.expect_silence().await?;
    Ok(())
}

#[tokio::test]
async fn unknown_destination_keeps_connection_open() -> Result<()> {
    let server = TestServer::start().await?;
    let mut client = server.ws_client().await?;

    client
        .send_frame(json!({ "destination": "/unknown/path" }))
        .await?;

    // No reply, no close; the session still works afterwards
    client.expect_silence().await?;
    client.subscribe("r1").await?;
    Ok(())
}

#[tokio::test]
async fn malformed_frame_keeps_connection_open() -> Result<()> {
    let server = TestServer::start().await?;
    let mut client = server.ws_client().await?;

    client.send_text("{{{ this is not a frame").await?;

    client.expect_silence().await?;
    client.subscribe("r1").await?;
    Ok(())
}

#[tokio::test]
async fn handler_failure_keeps_connection_open() -> Result<()> {
    let server = TestServer::start().await?;
    let mut client = server.ws_client().await?;

    // Publish with an unparseable body fails inside the handler
    client
        .send_frame(json!({ "destination": "/pub/r1", "body": "not a chat message" }))
        .await?;

    client.expect_silence().await?;
    client.subscribe("r1").await?;
    Ok(())
}

#[tokio::test]
async fn unsubscribe_stops_delivery() -> Result<()> {
    let server = TestServer::start().await?;
    let mut a = server.ws_client().await?;
    let mut b = server.ws_client().await?;

    a.subscribe("r1").await?;
    b.subscribe("r1").await?;
    b.unsubscribe("r1").await?;

    a.publish("r1", "A", "after unsub").await?;

    let echo = chat_body(&a.recv_frame().await?)?;
    assert_eq!(echo["content"], "after unsub");
    b.expect_silence().await?;
    Ok(())
}

#[tokio::test]
async fn http_broadcast_reaches_subscribers() -> Result<()> {
    let server = TestServer::start().await?;
    let mut client = server.ws_client().await?;
    client.subscribe("news").await?;

    let report = server.broadcast("news", "system", "hello from http").await?;
    assert_eq!(report["attempted"], 1);
    assert_eq!(report["delivered"], 1);

    let body = chat_body(&client.recv_frame().await?)?;
    assert_eq!(body["sender"], "system");
    assert_eq!(body["content"], "hello from http");
    Ok(())
}

#[tokio::test]
async fn http_broadcast_rejects_invalid_room() -> Result<()> {
    let server = TestServer::start().await?;
    let url = format!("{}/api/rooms/%20%2F/broadcast", server.base_url());
    let response = server
        .client
        .post(&url)
        .json(&json!({ "sender": "x", "content": "y" }))
        .send()
        .await?;

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn disconnect_cleans_up_room_membership() -> Result<()> {
    let server = TestServer::start().await?;
    let mut a = server.ws_client().await?;
    let b = server.ws_client().await?;

    a.subscribe("r1").await?;

    {
        let mut b = b;
        b.subscribe("r1").await?;
        b.close().await?;
    }

    // Cleanup runs asynchronously after the close; poll the broadcast
    // report until only one member remains
    let mut attempts = 0;
    loop {
        let report = server.broadcast("r1", "system", "ping").await?;
        if report["attempted"] == 1 {
            break;
        }
        attempts += 1;
        assert!(attempts < 50, "membership was not cleaned up: {report}");
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    // A stayed subscribed and keeps receiving
    let body = chat_body(&a.recv_frame().await?)?;
    assert_eq!(body["content"], "ping");
    Ok(())
}

#[tokio::test]
async fn encrypted_gateway_delivers_decryptable_content() -> Result<()> {
    let key = "0123456789abcdef";
    let mut config = AppConfig::for_testing();
    config.encryption.key = Some(key.to_string());

    let server = TestServer::start_with_config(config).await?;
    let mut a = server.ws_client().await?;
    a.subscribe("secure").await?;

    server.broadcast("secure", "system", "classified").await?;

    let body = chat_body(&a.recv_frame().await?)?;
    let ciphertext = body["content"].as_str().unwrap();
    assert_ne!(ciphertext, "classified");

    let cipher = Aes128Cipher::new(key)?;
    assert_eq!(cipher.decrypt(ciphertext)?, "classified");
    Ok(())
}
