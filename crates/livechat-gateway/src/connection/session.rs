//! Session - one live client connection
//!
//! A session owns the outbound half of a connection: pre-encoded frame text
//! is queued on an mpsc channel and drained by the connection's single
//! writer task, so concurrent sends never interleave partial writes.

use livechat_core::{RoomId, SessionId};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting outbound frames
    Open,
    /// Shutdown initiated, no new sends accepted
    Closing,
    /// Terminal; the connection is gone
    Closed,
}

/// Errors when writing to a session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// The session is closing or closed
    #[error("session {0} is not open")]
    NotOpen(SessionId),

    /// The outbound channel was dropped by the connection task
    #[error("session {0} outbound channel is closed")]
    ChannelClosed(SessionId),
}

/// One live client connection
pub struct Session {
    id: SessionId,
    state: RwLock<SessionState>,
    sender: mpsc::Sender<String>,
    /// Rooms this session has joined, kept for disconnect cleanup
    rooms: RwLock<HashSet<RoomId>>,
}

impl Session {
    /// Create a new session around an outbound channel
    pub fn new(id: SessionId, sender: mpsc::Sender<String>) -> Arc<Self> {
        Arc::new(Self {
            id,
            state: RwLock::new(SessionState::Open),
            sender,
            rooms: RwLock::new(HashSet::new()),
        })
    }

    /// Get the session id
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Get the current state
    pub async fn state(&self) -> SessionState {
        *self.state.read().await
    }

    /// Check whether the session accepts sends
    pub async fn is_open(&self) -> bool {
        *self.state.read().await == SessionState::Open
    }

    /// Queue pre-encoded frame text for delivery to the client
    pub async fn send(&self, text: &str) -> Result<(), SendError> {
        if !self.is_open().await {
            return Err(SendError::NotOpen(self.id));
        }
        self.sender
            .send(text.to_string())
            .await
            .map_err(|_| SendError::ChannelClosed(self.id))
    }

    /// Transition to `Closed`; idempotent
    pub async fn close(&self) {
        *self.state.write().await = SessionState::Closed;
    }

    /// Begin shutdown; further sends fail but the writer may drain
    pub async fn begin_close(&self) {
        let mut state = self.state.write().await;
        if *state == SessionState::Open {
            *state = SessionState::Closing;
        }
    }

    /// Record that this session joined a room
    pub async fn join_room(&self, room: RoomId) {
        self.rooms.write().await.insert(room);
    }

    /// Record that this session left a room
    pub async fn leave_room(&self, room: &RoomId) {
        self.rooms.write().await.remove(room);
    }

    /// Snapshot of the rooms this session belongs to
    pub async fn rooms(&self) -> Vec<RoomId> {
        self.rooms.read().await.iter().cloned().collect()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("id", &self.id).finish()
    }
}
