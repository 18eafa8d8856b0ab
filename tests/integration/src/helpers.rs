//! Test helpers
//!
//! Utilities for spawning a gateway on an ephemeral port and talking to it
//! over WebSocket and HTTP.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{anyhow, Result};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use livechat_common::AppConfig;
use livechat_gateway::{create_app, create_gateway_state};
use reqwest::Client;
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// How long to wait for an expected inbound frame
pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// How long to wait before declaring that no frame arrives
pub const SILENCE_TIMEOUT: Duration = Duration::from_millis(300);

/// A gateway instance bound to an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a gateway with default (unencrypted) test configuration
    pub async fn start() -> Result<Self> {
        Self::start_with_config(AppConfig::for_testing()).await
    }

    /// Start a gateway with custom configuration
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_gateway_state(config)?;
        let app = create_app(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(5)).build()?;

        Ok(Self {
            addr,
            client,
            _handle: handle,
        })
    }

    /// Base URL for HTTP requests
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// WebSocket URL
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Open a WebSocket client against this server
    pub async fn ws_client(&self) -> Result<WsClient> {
        WsClient::connect(&self.ws_url()).await
    }

    /// POST the out-of-band broadcast trigger, returning the delivery report
    pub async fn broadcast(&self, room: &str, sender: &str, content: &str) -> Result<Value> {
        let url = format!("{}/api/rooms/{room}/broadcast", self.base_url());
        let response = self
            .client
            .post(&url)
            .json(&json!({ "sender": sender, "content": content }))
            .send()
            .await?;
        Ok(response.json().await?)
    }
}

/// One WebSocket client connection
pub struct WsClient {
    write: SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>,
    read: SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>,
}

impl WsClient {
    /// Connect to the gateway
    pub async fn connect(url: &str) -> Result<Self> {
        let (stream, _) = connect_async(url).await?;
        let (write, read) = stream.split();
        Ok(Self { write, read })
    }

    /// Send raw text
    pub async fn send_text(&mut self, text: &str) -> Result<()> {
        self.write.send(Message::Text(text.to_string())).await?;
        Ok(())
    }

    /// Send a frame as JSON
    pub async fn send_frame(&mut self, frame: Value) -> Result<()> {
        self.send_text(&frame.to_string()).await
    }

    /// Receive the next text frame as JSON, failing after [`RECV_TIMEOUT`]
    pub async fn recv_frame(&mut self) -> Result<Value> {
        let deadline = tokio::time::timeout(RECV_TIMEOUT, async {
            while let Some(msg) = self.read.next().await {
                if let Ok(Message::Text(text)) = msg {
                    return Ok(serde_json::from_str(&text)?);
                }
            }
            Err(anyhow!("connection closed while waiting for frame"))
        });
        deadline.await.map_err(|_| anyhow!("timed out waiting for frame"))?
    }

    /// Assert that no text frame arrives within [`SILENCE_TIMEOUT`]
    pub async fn expect_silence(&mut self) -> Result<()> {
        let got = tokio::time::timeout(SILENCE_TIMEOUT, self.read.next()).await;
        match got {
            Err(_) => Ok(()),
            Ok(Some(Ok(Message::Text(text)))) => Err(anyhow!("unexpected frame: {text}")),
            Ok(_) => Ok(()),
        }
    }

    /// Subscribe to a room and wait for the acknowledgement
    pub async fn subscribe(&mut self, room: &str) -> Result<()> {
        self.send_frame(json!({ "destination": format!("/sub/{room}") }))
            .await?;
        let ack = self.recv_frame().await?;
        if ack["headers"]["ack"] != "subscribe" {
            return Err(anyhow!("expected subscribe ack, got: {ack}"));
        }
        Ok(())
    }

    /// Unsubscribe from a room and wait for the acknowledgement
    pub async fn unsubscribe(&mut self, room: &str) -> Result<()> {
        self.send_frame(json!({ "destination": format!("/unsub/{room}") }))
            .await?;
        let ack = self.recv_frame().await?;
        if ack["headers"]["ack"] != "unsubscribe" {
            return Err(anyhow!("expected unsubscribe ack, got: {ack}"));
        }
        Ok(())
    }

    /// Publish a chat message to a room
    pub async fn publish(&mut self, room: &str, sender: &str, content: &str) -> Result<()> {
        let body = json!({
            "roomId": room,
            "sender": sender,
            "content": content,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        self.send_frame(json!({
            "destination": format!("/pub/{room}"),
            "body": body.to_string(),
        }))
        .await
    }

    /// Close the connection
    pub async fn close(mut self) -> Result<()> {
        self.write.send(Message::Close(None)).await?;
        Ok(())
    }
}

/// Parse the chat message carried in a delivered frame's body
pub fn chat_body(frame: &Value) -> Result<Value> {
    let body = frame["body"]
        .as_str()
        .ok_or_else(|| anyhow!("frame has no body: {frame}"))?;
    Ok(serde_json::from_str(body)?)
}
