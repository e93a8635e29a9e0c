//! Server-wide registry: rooms, sessions and live sockets.
//!
//! The registry resolves each incoming message to a `(room, session)` pair
//! and forwards it into the room's lane. It owns nothing about game rules;
//! a room rejects its own joins (full, already started) through the join
//! reply channel.

use std::sync::{Arc, Weak};

use dashmap::DashMap;
use parking_lot::Mutex;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::oneshot;
use tracing::info;
use uuid::Uuid;

use crate::errors::GameError;
use crate::room::{spawn_room, Pacing, Room, RoomCommand, RoomConfig, RoomHandle};
use crate::server::transport::{SocketTable, Transport};
use crate::utils::room_code::generate_room_code;

/// What a session token is bound to, for the life of the token.
#[derive(Debug, Clone)]
pub struct Session {
    pub name: String,
    pub room_code: String,
}

#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub pacing: Pacing,
    /// Fixed seed for every room's RNG; `None` (production) seeds each room
    /// from entropy.
    pub room_seed: Option<u64>,
}

/// Shared, cheaply cloneable server state.
#[derive(Clone)]
pub struct GameServer {
    inner: Arc<Inner>,
}

struct Inner {
    rooms: DashMap<String, RoomHandle>,
    sessions: DashMap<Uuid, Session>,
    sockets: Arc<SocketTable>,
    rng: Mutex<ChaCha8Rng>,
    config: ServerConfig,
}

impl GameServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                rooms: DashMap::new(),
                sessions: DashMap::new(),
                sockets: Arc::new(SocketTable::new()),
                rng: Mutex::new(ChaCha8Rng::seed_from_u64(rand::random())),
                config,
            }),
        }
    }

    pub fn sockets(&self) -> Arc<SocketTable> {
        self.inner.sockets.clone()
    }

    pub fn room_count(&self) -> usize {
        self.inner.rooms.len()
    }

    pub fn session(&self, session_id: Uuid) -> Option<Session> {
        self.inner.sessions.get(&session_id).map(|s| s.clone())
    }

    /// Create a room and seat the requester as its first player. The room
    /// acks with `gameCreated` on the supplied transport.
    pub async fn create(
        &self,
        name: &str,
        transport: Arc<dyn Transport>,
    ) -> Result<Uuid, GameError> {
        let code = self.unique_code();
        let room = Room::new(
            code.clone(),
            RoomConfig {
                pacing: self.inner.config.pacing,
                seed: self.inner.config.room_seed,
            },
            self.inner.sockets.clone(),
        );

        let weak = Arc::downgrade(&self.inner);
        let cleanup_code = code.clone();
        let handle = spawn_room(room, move || Inner::teardown_room(&weak, &cleanup_code));
        self.inner.rooms.insert(code.clone(), handle);
        info!(code = %code, "room created");

        self.seat(&code, name, transport, true).await
    }

    /// Join an existing room in its waiting phase. The room acks with
    /// `joined` and announces `playerJoined`.
    pub async fn join(
        &self,
        code: &str,
        name: &str,
        transport: Arc<dyn Transport>,
    ) -> Result<Uuid, GameError> {
        self.seat(code, name, transport, false).await
    }

    async fn seat(
        &self,
        code: &str,
        name: &str,
        transport: Arc<dyn Transport>,
        created: bool,
    ) -> Result<Uuid, GameError> {
        let handle = self
            .inner
            .rooms
            .get(code)
            .map(|h| h.clone())
            .ok_or(GameError::RoomNotFound)?;

        // Register optimistically so the room can ack through the socket
        // table; rolled back if the room refuses the seat.
        let session_id = Uuid::new_v4();
        self.inner.sessions.insert(
            session_id,
            Session {
                name: name.to_string(),
                room_code: code.to_string(),
            },
        );
        self.inner.sockets.register(session_id, transport);

        let (reply_tx, reply_rx) = oneshot::channel();
        let result = match handle.send(RoomCommand::Join {
            session_id,
            name: name.to_string(),
            created,
            reply: reply_tx,
        }) {
            Err(err) => Err(err),
            Ok(()) => reply_rx.await.unwrap_or(Err(GameError::RoomNotFound)),
        };

        match result {
            Ok(()) => Ok(session_id),
            Err(err) => {
                self.inner.sessions.remove(&session_id);
                self.inner.sockets.unregister(session_id);
                Err(err)
            }
        }
    }

    /// Rebind a live socket to an existing session and replay the current
    /// state to just that socket. Idempotent: repeating it only swaps the
    /// bound transport.
    pub fn reconnect(
        &self,
        session_id: Uuid,
        transport: Arc<dyn Transport>,
    ) -> Result<(), GameError> {
        let session = self
            .inner
            .sessions
            .get(&session_id)
            .map(|s| s.clone())
            .ok_or(GameError::InvalidSession)?;
        let handle = self
            .inner
            .rooms
            .get(&session.room_code)
            .map(|h| h.clone())
            .ok_or(GameError::RoomNotFound)?;

        self.inner.sockets.register(session_id, transport);
        handle.send(RoomCommand::Reconnect { session_id })?;
        info!(session_id = %session_id, code = %session.room_code, "session reconnected");
        Ok(())
    }

    /// Route a room-level command from an established session.
    pub fn dispatch(&self, session_id: Uuid, cmd: RoomCommand) -> Result<(), GameError> {
        let session = self
            .inner
            .sessions
            .get(&session_id)
            .map(|s| s.clone())
            .ok_or(GameError::InvalidSession)?;
        let handle = self
            .inner
            .rooms
            .get(&session.room_code)
            .map(|h| h.clone())
            .ok_or(GameError::RoomNotFound)?;
        handle.send(cmd)
    }

    /// Socket closed. The participant stays seated (reconnects keep the
    /// same token); the room decides whether it is now abandoned.
    pub fn disconnect(&self, session_id: Uuid) {
        self.inner.sockets.unregister(session_id);
        if let Some(session) = self.inner.sessions.get(&session_id) {
            if let Some(handle) = self.inner.rooms.get(&session.room_code) {
                let _ = handle.send(RoomCommand::Disconnected { session_id });
            }
        }
    }

    fn unique_code(&self) -> String {
        loop {
            let code = generate_room_code(&mut *self.inner.rng.lock());
            if !self.inner.rooms.contains_key(&code) {
                return code;
            }
        }
    }
}

impl Inner {
    /// Drop a dead room and garbage-collect its sessions.
    fn teardown_room(inner: &Weak<Inner>, code: &str) {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        inner.rooms.remove(code);
        inner.sessions.retain(|session_id, session| {
            if session.room_code == code {
                inner.sockets.unregister(*session_id);
                false
            } else {
                true
            }
        });
        info!(code, "room destroyed");
    }
}
