use teloxide::types::ChatId;

use crate::api::types::Role;

/// Представление бота об авторизации в конкретном чате
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    pub chat_id: ChatId,
    pub token: Option<String>,
    pub role: Option<Role>,
    pub email: Option<String>,
}

impl UserSession {
    pub fn new(chat_id: ChatId) -> Self {
        Self {
            chat_id,
            token: None,
            role: None,
            email: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_some_and(|role| role.is_elevated())
    }

    pub fn sign_in(&mut self, token: String, role: Role, email: String) {
        self.token = Some(token);
        self.role = Some(role);
        self.email = Some(email);
    }

    pub fn sign_out(&mut self) {
        self.token = None;
        self.role = None;
        self.email = None;
    }
}
