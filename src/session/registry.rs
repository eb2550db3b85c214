//! Converter session management
//!
//! Each client session owns its own conversion engine. The store is the only
//! shared object and hands out one engine at a time under its lock.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::conversion::{ConversionEngine, ConversionError};

/// Session error types
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session {0} not found")]
    NotFound(u64),

    #[error("Session limit reached ({0} open sessions)")]
    LimitReached(usize),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("Session store lock poisoned")]
    LockPoisoned,
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// One open converter
#[derive(Debug, Clone)]
pub struct Session {
    pub id: u64,
    pub created_at: String,
    pub engine: ConversionEngine,
}

/// All open sessions, keyed by id
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: BTreeMap<u64, Session>,
    next_id: u64,
    max_sessions: usize,
}

impl SessionRegistry {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: BTreeMap::new(),
            next_id: 1,
            max_sessions,
        }
    }

    /// Register a prepared engine as a new session
    pub fn open(&mut self, engine: ConversionEngine) -> SessionResult<&Session> {
        if self.sessions.len() >= self.max_sessions {
            return Err(SessionError::LimitReached(self.max_sessions));
        }

        let id = self.next_id;
        self.next_id += 1;

        let session = Session {
            id,
            created_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            engine,
        };
        tracing::info!("Opened converter session {}", id);
        Ok(&*self.sessions.entry(id).or_insert(session))
    }

    pub fn get(&self, id: u64) -> SessionResult<&Session> {
        self.sessions.get(&id).ok_or(SessionError::NotFound(id))
    }

    pub fn get_mut(&mut self, id: u64) -> SessionResult<&mut Session> {
        self.sessions.get_mut(&id).ok_or(SessionError::NotFound(id))
    }

    /// Discard a session; its state is not kept anywhere
    pub fn close(&mut self, id: u64) -> SessionResult<Session> {
        let session = self.sessions.remove(&id).ok_or(SessionError::NotFound(id))?;
        tracing::info!("Closed converter session {}", id);
        Ok(session)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }
}

/// Shared handle to the session registry
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<SessionRegistry>>,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionRegistry::new(max_sessions))),
        }
    }

    /// Execute a closure with the locked registry
    pub fn with_registry<F, T>(&self, f: F) -> SessionResult<T>
    where
        F: FnOnce(&mut SessionRegistry) -> SessionResult<T>,
    {
        let mut registry = self.inner.lock().map_err(|_| SessionError::LockPoisoned)?;
        f(&mut registry)
    }

    /// Execute a closure against one session's engine
    pub fn with_engine<F, T>(&self, id: u64, f: F) -> SessionResult<T>
    where
        F: FnOnce(&mut ConversionEngine) -> SessionResult<T>,
    {
        self.with_registry(|registry| f(&mut registry.get_mut(id)?.engine))
    }
}
