use serde::{Deserialize, Serialize};
use validator::Validate;

use super::chat::ChatMessage;

/// System instructions plus the user data message, fixed once composed.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReportPrompt {
    #[validate(length(min = 1))]
    system: String,
    #[validate(length(min = 1))]
    user: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ReportPrompt {
    pub fn new(system: String, user: String) -> Self {
        Self {
            system,
            user,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// The two-message conversation sent to the completion endpoint.
    pub fn to_messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system.clone()),
            ChatMessage::user(self.user.clone()),
        ]
    }
}
