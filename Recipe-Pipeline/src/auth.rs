use std::fmt;

/// Source of the signed-in user's id.
pub trait AuthSession: Send + Sync + fmt::Debug {
    /// The current user's uid, `None` when signed out.
    fn current_user(&self) -> Option<String>;
}

/// An [`AuthSession`] with a fixed user.
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    uid: Option<String>,
}

impl StaticAuth {
    pub fn signed_in(uid: impl Into<String>) -> Self {
        Self {
            uid: Some(uid.into()),
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }
}

impl AuthSession for StaticAuth {
    fn current_user(&self) -> Option<String> {
        self.uid.clone()
    }
}
