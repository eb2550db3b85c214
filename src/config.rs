//! Server configuration
//!
//! Read once at startup from the environment.

/// Default cap on concurrently open converter sessions
pub const DEFAULT_MAX_SESSIONS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Maximum number of open sessions (`ULC_MAX_SESSIONS`)
    pub max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl ServerConfig {
    /// Build the config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_sessions = match lookup("ULC_MAX_SESSIONS") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    tracing::warn!(
                        "Ignoring invalid ULC_MAX_SESSIONS '{}', using {}",
                        raw,
                        DEFAULT_MAX_SESSIONS
                    );
                    DEFAULT_MAX_SESSIONS
                }
            },
            None => DEFAULT_MAX_SESSIONS,
        };

        Self { max_sessions }
    }
}
