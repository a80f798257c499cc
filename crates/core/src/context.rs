//! Caller identity, passed explicitly into every service.

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// The authenticated user a request acts on behalf of. Services never read
/// identity from ambient state; callers construct a context and pass it in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    /// The acting user
    pub user_id: UserId,

    /// Display name, printed on certificates when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl UserContext {
    /// Create a context for a known user.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            display_name: None,
        }
    }

    /// Attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Build a context from an optional identity, failing when no user is
    /// signed in.
    pub fn require(user_id: Option<UserId>) -> Result<Self, AuthError> {
        user_id.map(Self::new).ok_or(AuthError::Required)
    }

    /// Name printed on certificates; falls back to the user id.
    pub fn recipient_name(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| self.user_id.to_string())
    }
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No active user session
    #[error("no active session: sign in required")]
    Required,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_with_user() {
        let id = UserId::new();
        let ctx = UserContext::require(Some(id)).unwrap();
        assert_eq!(ctx.user_id, id);
    }

    #[test]
    fn test_require_without_user_fails() {
        assert!(matches!(UserContext::require(None), Err(AuthError::Required)));
    }
}
