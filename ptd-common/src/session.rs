//! Session context.
//!
//! Identity is established by an external credential service; the services in
//! this workspace only ever see an already-verified user name and role. The
//! context is built once per request/connection and threaded explicitly into
//! every operation that needs it.

use serde::{Deserialize, Serialize};

/// What a session is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May create and update programs.
    Coordinator,
    /// Read-only observer.
    Viewer,
}

/// One authenticated (or anonymous read-only) session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Display name recorded in audit entries.
    pub usuario: String,
    pub role: Role,
}

impl SessionContext {
    pub fn new(usuario: impl Into<String>, role: Role) -> Self {
        SessionContext {
            usuario: usuario.into(),
            role,
        }
    }

    /// The session used when no identity was presented: a read-only viewer.
    pub fn anonymous() -> Self {
        SessionContext::new("Usuário", Role::Viewer)
    }

    pub fn can_edit(&self) -> bool {
        self.role == Role::Coordinator
    }
}

impl Role {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "coordinator" => Some(Self::Coordinator),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }
}
