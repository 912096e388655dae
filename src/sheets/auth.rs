use std::sync::RwLock;

/// Bearer token for the direct Sheets transport, shared by whoever
/// authorizes and whoever saves.
#[derive(Debug, Default)]
pub struct AuthSession {
    token: RwLock<Option<String>>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.authorize(token);
        session
    }

    /// Blank tokens are ignored.
    pub fn authorize(&self, token: impl Into<String>) {
        let token = token.into();
        if token.trim().is_empty() {
            return;
        }
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token);
        }
    }

    pub fn revoke(&self) {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|slot| slot.clone())
    }

    pub fn is_authorized(&self) -> bool {
        self.token().is_some()
    }
}
