//! Room registry
//!
//! Tracks live sessions and per-room membership using `DashMap` for
//! concurrent access from all connection tasks.

use super::Session;
use dashmap::DashMap;
use livechat_core::{RoomId, SessionId};
use std::collections::HashSet;
use std::sync::Arc;

/// Thread-safe registry of sessions and room membership
///
/// Rooms are created lazily on first subscribe and pruned when their member
/// set becomes empty, so sustained churn never leaks empty rooms.
pub struct RoomRegistry {
    /// Live sessions by id
    sessions: DashMap<SessionId, Arc<Session>>,

    /// Room id to member session ids
    rooms: DashMap<RoomId, HashSet<SessionId>>,
}

impl RoomRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            rooms: DashMap::new(),
        }
    }

    /// Create an empty registry wrapped in `Arc`
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a live session
    pub fn add_session(&self, session: Arc<Session>) {
        let session_id = session.id();
        self.sessions.insert(session_id, session);
        tracing::debug!(%session_id, "Session registered");
    }

    /// Look up a session by id
    pub fn session(&self, session_id: SessionId) -> Option<Arc<Session>> {
        self.sessions.get(&session_id).map(|r| r.clone())
    }

    /// Add a session to a room's member set; idempotent
    ///
    /// Returns `false` when the session is not registered (already removed
    /// by disconnect cleanup).
    pub async fn subscribe(&self, room: &RoomId, session: &Arc<Session>) -> bool {
        if !self.sessions.contains_key(&session.id()) {
            return false;
        }

        self.rooms
            .entry(room.clone())
            .or_default()
            .insert(session.id());
        session.join_room(room.clone()).await;

        tracing::debug!(session_id = %session.id(), %room, "Subscribed to room");
        true
    }

    /// Remove a session from a room's member set; no-op if absent
    pub async fn unsubscribe(&self, room: &RoomId, session: &Arc<Session>) {
        // Atomically modify the member set, then prune empty rooms
        self.rooms.alter(room, |_, mut members| {
            members.remove(&session.id());
            members
        });
        self.rooms.retain(|_, members| !members.is_empty());

        session.leave_room(room).await;

        tracing::debug!(session_id = %session.id(), %room, "Unsubscribed from room");
    }

    /// Point-in-time snapshot of a room's members
    ///
    /// The returned vector is detached from the live member set, so fan-out
    /// stays consistent even if membership changes mid-broadcast. Sessions
    /// already removed from the registry are skipped.
    pub fn members_of(&self, room: &RoomId) -> Vec<Arc<Session>> {
        self.rooms
            .get(room)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|id| self.sessions.get(id).map(|s| s.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Check whether a session is a member of a room
    pub fn is_member(&self, room: &RoomId, session_id: SessionId) -> bool {
        self.rooms
            .get(room)
            .is_some_and(|members| members.contains(&session_id))
    }

    /// Remove a closed session from the registry and from every room it
    /// joined
    ///
    /// Keyed on the session map removal, so concurrent calls clean up at
    /// most once. Sweeps the whole room map rather than the session's own
    /// room set, so a membership recorded without the matching session-side
    /// update is still cleaned up.
    pub async fn remove_session(&self, session_id: SessionId) {
        if self.sessions.remove(&session_id).is_none() {
            return;
        }

        self.rooms.retain(|_, members| {
            members.remove(&session_id);
            !members.is_empty()
        });

        tracing::debug!(%session_id, "Session removed from registry");
    }

    /// Number of live sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Number of rooms with at least one member
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RoomRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomRegistry")
            .field("sessions", &self.sessions.len())
            .field("rooms", &self.rooms.len())
            .finish()
    }
}
