use std::collections::HashMap;
use std::sync::Arc;

use teloxide::types::{ChatId, UserId};
use tokio::sync::RwLock;

use crate::models::{ConversationState, UserSession};

type SessionMap = Arc<RwLock<HashMap<ChatId, UserSession>>>;
type ConversationMap = Arc<RwLock<HashMap<UserId, ConversationState>>>;

/// Сессии (по chat id) и активные сценарии (по user id).
/// Живут только в памяти процесса: перезапуск сбрасывает всё.
#[derive(Clone, Default)]
pub struct BotState {
    sessions: SessionMap,
    conversations: ConversationMap,
}

impl BotState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Сессия чата; создаётся пустой при первом обращении
    pub async fn get_session(&self, chat_id: ChatId) -> UserSession {
        {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(&chat_id) {
                return session.clone();
            }
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(chat_id)
            .or_insert_with(|| UserSession::new(chat_id))
            .clone()
    }

    pub async fn save_session(&self, session: UserSession) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.chat_id, session);
    }

    pub async fn sign_out(&self, chat_id: ChatId) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(&chat_id) {
            session.sign_out();
        }
    }

    pub async fn get_conversation(&self, user_id: UserId) -> Option<ConversationState> {
        let conversations = self.conversations.read().await;
        conversations.get(&user_id).cloned()
    }

    /// Новый сценарий заменяет предыдущий
    pub async fn start_conversation(&self, user_id: UserId, state: ConversationState) {
        let mut conversations = self.conversations.write().await;
        if let Some(previous) = conversations.insert(user_id, state) {
            log::debug!(
                "🔁 Flow {} replaced for user {}",
                previous.flow_kind(),
                user_id
            );
        }
    }

    /// Забирает сценарий из хранилища (удаляя его)
    pub async fn take_conversation(&self, user_id: UserId) -> Option<ConversationState> {
        let mut conversations = self.conversations.write().await;
        conversations.remove(&user_id)
    }

    pub async fn conversation_count(&self) -> usize {
        self.conversations.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Role;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn session_is_created_on_first_access() {
        let state = BotState::new();
        let session = state.get_session(ChatId(5)).await;

        assert_eq!(session, UserSession::new(ChatId(5)));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn sign_out_clears_credentials() {
        let state = BotState::new();
        let mut session = state.get_session(ChatId(1)).await;
        session.sign_in("tok".to_string(), Role::Admin, "admin@uni.ru".to_string());
        state.save_session(session).await;
        assert!(state.get_session(ChatId(1)).await.is_admin());

        state.sign_out(ChatId(1)).await;
        let session = state.get_session(ChatId(1)).await;
        assert!(!session.is_authenticated());
        assert_eq!(session.role, None);
    }

    #[tokio::test]
    async fn starting_a_flow_replaces_the_previous_one() {
        let state = BotState::new();
        state.start_conversation(UserId(9), ConversationState::register()).await;
        state.start_conversation(UserId(9), ConversationState::login()).await;

        assert_eq!(state.conversation_count().await, 1);
        assert_eq!(
            state.get_conversation(UserId(9)).await,
            Some(ConversationState::login())
        );
    }

    #[tokio::test]
    async fn stores_are_isolated_per_user() {
        let state = BotState::new();
        state.start_conversation(UserId(1), ConversationState::register()).await;
        state.start_conversation(UserId(2), ConversationState::add_material()).await;

        assert_eq!(state.take_conversation(UserId(1)).await, Some(ConversationState::register()));
        assert_eq!(state.take_conversation(UserId(1)).await, None);
        assert_eq!(
            state.get_conversation(UserId(2)).await,
            Some(ConversationState::add_material())
        );
    }
}
