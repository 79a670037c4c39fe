use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

/// Idle time after which a session is dropped.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);
/// Upper bound on concurrently held sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Opaque per-client key for the session store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(Uuid);

impl SessionToken {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a token previously issued by `generate`. Anything else is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user's age as submitted: clients send either a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Age {
    Number(serde_json::Number),
    Text(String),
}

impl Age {
    /// Accepts a non-zero number or a non-empty string. Every other JSON value
    /// counts as "not provided".
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => {
                Some(Age::Number(n.clone()))
            }
            Value::String(s) if !s.is_empty() => Some(Age::Text(s.clone())),
            _ => None,
        }
    }
}

/// The state kept for a logged-in client. Both fields are always set together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub user: String,
    pub age: Age,
}

impl Session {
    /// Builds a session from raw login fields, or `None` if either is missing
    /// or falsy.
    pub fn from_credentials(name: Option<&Value>, age: Option<&Value>) -> Option<Self> {
        let user = match name? {
            Value::String(s) if !s.is_empty() => s.clone(),
            _ => return None,
        };
        let age = Age::from_json(age?)?;
        Some(Self { user, age })
    }

    pub fn greeting(&self) -> String {
        format!("Welcome, {}", self.user)
    }
}

#[derive(Debug)]
struct Entry {
    session: Session,
    last_seen: Instant,
}

/// In-memory session store shared by all request handlers.
///
/// Entries are only ever inserted whole and removed whole, so a token maps to
/// either a complete `Session` or nothing. Tokens are always minted here, never
/// taken from the client. Sessions idle for longer than the TTL are dropped,
/// and the store never holds more than `max_sessions` entries. Clones share the
/// same map.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionToken, Entry>>>,
    ttl: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_SESSION_TTL, DEFAULT_MAX_SESSIONS)
    }

    /// `max_sessions` is clamped to at least one.
    pub fn with_limits(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::default(),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Stores `session` under a freshly issued token and returns that token.
    ///
    /// The caller's previous session, if any, is discarded. Expired sessions
    /// are swept first; if the store is still full, the least recently used
    /// session is evicted.
    pub async fn login(
        &self,
        previous: Option<SessionToken>,
        session: Session,
    ) -> SessionToken {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        if let Some(previous) = previous {
            if sessions.remove(&previous).is_some() {
                tracing::debug!(%previous, "Replaced existing session");
            }
        }

        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < self.ttl);
        if sessions.len() < before {
            tracing::debug!(expired = before - sessions.len(), "Swept idle sessions");
        }

        if sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(token, _)| *token);
            if let Some(oldest) = oldest {
                sessions.remove(&oldest);
                tracing::warn!("Session store full, evicted least recently used session");
            }
        }

        let token = SessionToken::generate();
        sessions.insert(
            token,
            Entry {
                session,
                last_seen: now,
            },
        );
        token
    }

    /// Returns the session for `token` and marks it as used. Expired sessions
    /// are removed and reported as absent.
    pub async fn get(&self, token: &SessionToken) -> Option<Session> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(token)?;
        if now.duration_since(entry.last_seen) >= self.ttl {
            sessions.remove(token);
            return None;
        }
        entry.last_seen = now;
        Some(entry.session.clone())
    }

    /// Clears the caller's session. Returns whether anything was removed;
    /// logging out twice is harmless.
    pub async fn logout(&self, token: &SessionToken) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
