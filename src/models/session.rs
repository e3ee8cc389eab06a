use serde::{Deserialize, Serialize};

/// Identity of the signed-in user, passed explicitly to whatever needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub user_id: i64,
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,
}

impl SessionContext {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            access_token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}
