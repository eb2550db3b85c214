//! Session module
//!
//! Per-client converter sessions behind a shared store.

pub mod registry;

pub use registry::{Session, SessionError, SessionRegistry, SessionResult, SessionStore};
