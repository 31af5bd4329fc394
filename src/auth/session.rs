use uuid::Uuid;

use crate::remote::IdentityProvider;

/// Identity of one caller, resolved once from a verified token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<Uuid>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    pub fn authenticated(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }
}

impl IdentityProvider for Session {
    async fn current_user(&self) -> Option<Uuid> {
        self.user_id
    }

    async fn sign_out(&mut self) {
        if let Some(user_id) = self.user_id.take() {
            tracing::info!(user_id = %user_id, "Signed out");
        }
    }
}
