use std::sync::Arc;

use reqwest::StatusCode;
use teloxide::types::{ChatId, UserId};
use teloxide::utils::command::BotCommands;

use crate::api::types::{MaterialId, NewComment, Role};
use crate::api::MaterialsApi;
use crate::bot_state::BotState;
use crate::config::FlowRules;
use crate::conversation::{self, TerminalAction, Transition};
use crate::handlers::actions::CallbackAction;
use crate::handlers::reply::Reply;
use crate::handlers::utils::{
    admin_panel_keyboard, cancel_keyboard, escape_markdown_v2, format_comments, format_material,
    material_keyboard,
};
use crate::models::{ConversationState, UserSession};
use crate::Command;

pub const UNRECOGNIZED: &str = "Я не понимаю эту команду. Введите /start для списка команд.";
pub const PERMISSION_DENIED: &str = "У вас нет прав доступа к этой команде.";
pub const LOGIN_REQUIRED: &str = "❌ Необходимо войти в систему: /login";
pub const CANCELLED: &str = "Операция отменена.";

/// Кто прислал событие
#[derive(Debug, Clone)]
pub struct ChatUser {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub first_name: String,
}

impl ChatUser {
    pub fn new(chat_id: ChatId, user_id: UserId, first_name: impl Into<String>) -> Self {
        Self {
            chat_id,
            user_id,
            first_name: first_name.into(),
        }
    }
}

/// Единая точка входа для команд, текста и нажатий кнопок
#[derive(Clone)]
pub struct EventDispatcher {
    state: BotState,
    api: Arc<dyn MaterialsApi>,
    rules: FlowRules,
}

impl EventDispatcher {
    pub fn new(state: BotState, api: Arc<dyn MaterialsApi>, rules: FlowRules) -> Self {
        Self { state, api, rules }
    }

    pub async fn handle_command(&self, user: &ChatUser, command: Command) -> Vec<Reply> {
        match command {
            Command::Start => vec![self.welcome(user).await],
            Command::Help => vec![Reply::text(Command::descriptions().to_string())],
            Command::Register => self.start_flow(user, ConversationState::register()).await,
            Command::Login => self.start_flow(user, ConversationState::login()).await,
            Command::Logout => self.logout(user).await,
            Command::Materials => self.list_materials(user).await,
            Command::Admin => self.admin_panel(user).await,
            Command::Cancel => vec![self.cancel(user).await],
        }
    }

    /// Известные команды сюда не доходят: их забирает ветка `filter_command`
    pub async fn handle_text(&self, user: &ChatUser, text: &str) -> Vec<Reply> {
        let Some(conversation) = self.state.take_conversation(user.user_id).await else {
            return vec![Reply::text(UNRECOGNIZED)];
        };

        let flow = conversation.flow_kind();
        log::debug!(
            "📝 Flow {} step {} input from user {}",
            flow,
            conversation.step_name(),
            user.user_id
        );

        match conversation::advance(conversation, text, &self.rules) {
            Transition::Continue { state, prompt } => {
                self.state.start_conversation(user.user_id, state).await;
                vec![Reply::text(prompt).with_markup(cancel_keyboard())]
            }
            Transition::Finish(action) => {
                log::info!("🏁 Flow {} finished for user {}", flow, user.user_id);
                vec![self.execute(user, action).await]
            }
        }
    }

    pub async fn handle_callback(&self, user: &ChatUser, data: &str) -> Vec<Reply> {
        let Some(action) = CallbackAction::parse(data) else {
            log::warn!("Unknown callback data {:?} from user {}", data, user.user_id);
            return Vec::new();
        };

        match action {
            CallbackAction::Cancel => vec![self.cancel(user).await.edit()],
            CallbackAction::AddMaterial => self.start_add(user).await,
            CallbackAction::ListMaterials => self.list_materials(user).await,
            CallbackAction::Edit(id) => vec![self.start_edit(user, id).await],
            CallbackAction::Delete(id) => vec![self.delete_material(user, id).await],
            CallbackAction::Comments(id) => vec![self.list_comments(id).await],
            // Карточку материала не трогаем, вопрос приходит новым сообщением
            CallbackAction::Comment(id) => {
                self.start_flow(user, ConversationState::add_comment(id)).await
            }
        }
    }

    async fn welcome(&self, user: &ChatUser) -> Reply {
        let session = self.state.get_session(user.chat_id).await;

        let mut text = format!(
            "Привет, {}!\n\n\
            Я бот для работы с учебными материалами.\n\n\
            Доступные команды:\n\
            /login - Войти в систему\n\
            /register - Зарегистрироваться\n\
            /materials - Просмотр учебных материалов\n\
            /logout - Выйти из системы\n\
            /cancel - Отменить текущую операцию\n",
            user.first_name
        );

        if session.is_authenticated() {
            let role = session.role.unwrap_or_default();
            text.push_str(&format!("\nВы вошли как {}.", role.as_str()));
            if role.is_elevated() {
                text.push_str("\n/admin - Панель администратора");
            }
        }

        Reply::text(text)
    }

    async fn start_flow(&self, user: &ChatUser, state: ConversationState) -> Vec<Reply> {
        let prompt = conversation::prompt_for(&state);
        log::info!("▶️ Flow {} started for user {}", state.flow_kind(), user.user_id);
        self.state.start_conversation(user.user_id, state).await;
        log::debug!("Active flows: {}", self.state.conversation_count().await);

        vec![Reply::text(prompt).with_markup(cancel_keyboard())]
    }

    async fn cancel(&self, user: &ChatUser) -> Reply {
        if let Some(previous) = self.state.take_conversation(user.user_id).await {
            log::info!("✋ Flow {} cancelled by user {}", previous.flow_kind(), user.user_id);
        }
        Reply::text(CANCELLED)
    }

    async fn logout(&self, user: &ChatUser) -> Vec<Reply> {
        self.state.take_conversation(user.user_id).await;

        let session = self.state.get_session(user.chat_id).await;
        if !session.is_authenticated() {
            return vec![Reply::text("Вы не вошли в систему.")];
        }

        self.state.sign_out(user.chat_id).await;
        log::info!("👋 Chat {} signed out", user.chat_id);
        vec![Reply::text("Вы вышли из системы.")]
    }

    /// Доступ к действиям администратора
    async fn admin_session(&self, user: &ChatUser) -> Option<UserSession> {
        let session = self.state.get_session(user.chat_id).await;
        if session.is_admin() {
            Some(session)
        } else {
            log::warn!("⛔ Admin action denied for chat {}", user.chat_id);
            None
        }
    }

    async fn admin_panel(&self, user: &ChatUser) -> Vec<Reply> {
        if self.admin_session(user).await.is_none() {
            return vec![Reply::text(PERMISSION_DENIED)];
        }
        vec![Reply::text("Панель администратора:").with_markup(admin_panel_keyboard())]
    }

    async fn start_add(&self, user: &ChatUser) -> Vec<Reply> {
        if self.admin_session(user).await.is_none() {
            return vec![Reply::text(PERMISSION_DENIED).edit()];
        }

        self.start_flow(user, ConversationState::add_material())
            .await
            .into_iter()
            .map(Reply::edit)
            .collect()
    }

    async fn start_edit(&self, user: &ChatUser, id: MaterialId) -> Reply {
        if self.admin_session(user).await.is_none() {
            return Reply::text(PERMISSION_DENIED).edit();
        }

        match self.api.get_material(id).await {
            Ok(material) => {
                let state = ConversationState::edit_material(material);
                let prompt = format!(
                    "Редактирование материала. {}",
                    conversation::prompt_for(&state)
                );
                log::info!("▶️ Flow {} started for user {}", state.flow_kind(), user.user_id);
                self.state.start_conversation(user.user_id, state).await;
                Reply::text(prompt).with_markup(cancel_keyboard()).edit()
            }
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND) => {
                log::warn!("Material {} not found", id);
                Reply::text("Материал не найден.").edit()
            }
            Err(e) => {
                log::error!("Error fetching material {}: {}", id, e);
                Reply::text(format!(
                    "Произошла ошибка при получении материала: {}",
                    e.user_message()
                ))
                .edit()
            }
        }
    }

    /// Удаление без подтверждения
    async fn delete_material(&self, user: &ChatUser, id: MaterialId) -> Reply {
        let Some(session) = self.admin_session(user).await else {
            return Reply::text(PERMISSION_DENIED).edit();
        };
        let Some(token) = session.token.as_deref() else {
            return Reply::text(LOGIN_REQUIRED).edit();
        };

        match self.api.delete_material(token, id).await {
            Ok(_) => {
                log::info!("🗑 Material {} deleted from chat {}", id, user.chat_id);
                Reply::text("Материал успешно удален!").edit()
            }
            Err(e) => {
                log::error!("Error deleting material {}: {}", id, e);
                Reply::text(format!(
                    "Произошла ошибка при удалении материала: {}",
                    e.user_message()
                ))
                .edit()
            }
        }
    }

    async fn list_materials(&self, user: &ChatUser) -> Vec<Reply> {
        let materials = match self.api.list_materials().await {
            Ok(materials) => materials,
            Err(e) => {
                log::error!("Error fetching materials: {}", e);
                return vec![Reply::text("Произошла ошибка при получении материалов.")];
            }
        };

        if materials.is_empty() {
            return vec![Reply::text("Нет доступных материалов.")];
        }

        let is_admin = self.state.get_session(user.chat_id).await.is_admin();
        materials
            .iter()
            .map(|m| Reply::text(format_material(m)).with_markup(material_keyboard(m.id, is_admin)))
            .collect()
    }

    async fn list_comments(&self, id: MaterialId) -> Reply {
        match self.api.list_comments(id).await {
            Ok(comments) => Reply::text(format_comments(id, &comments)),
            Err(e) => {
                log::error!("Error fetching comments for material {}: {}", id, e);
                Reply::text("Произошла ошибка при получении комментариев.")
            }
        }
    }

    /// Терминальное действие сценария; состояние к этому моменту уже удалено
    async fn execute(&self, user: &ChatUser, action: TerminalAction) -> Reply {
        match action {
            TerminalAction::Register(request) => match self.api.register(&request).await {
                Ok(_) if request.role == Role::Admin => {
                    log::info!("✅ Admin registered from chat {}", user.chat_id);
                    Reply::text(format!(
                        "🎉 *{}*\n\n{}",
                        escape_markdown_v2("Вы зарегистрированы как АДМИНИСТРАТОР!"),
                        escape_markdown_v2(
                            "Теперь войдите в систему /login\n\n\
                            Ваши привилегии:\n\
                            • Доступ к панели /admin\n\
                            • Управление учебными материалами\n\
                            • Редактирование контента"
                        )
                    ))
                    .markdown()
                }
                Ok(_) => {
                    log::info!("✅ User registered from chat {}", user.chat_id);
                    Reply::text("✅ Вы успешно зарегистрированы как пользователь")
                }
                Err(e) => {
                    log::error!("Registration error: {}", e);
                    Reply::text(format!("❌ Ошибка регистрации: {}", e.user_message()))
                }
            },

            TerminalAction::Login(request) => match self.api.login(&request).await {
                Ok(response) => {
                    let role = response.resolved_role();
                    let mut session = self.state.get_session(user.chat_id).await;
                    session.sign_in(response.token, role, request.email);
                    self.state.save_session(session).await;
                    log::info!("🔑 Chat {} signed in as {}", user.chat_id, role.as_str());

                    let mut text = format!(
                        "Вход успешен! Ваша роль: {}\n\
                        Теперь вы можете просматривать материалы с помощью /materials",
                        role.as_str()
                    );
                    if role.is_elevated() {
                        text.push_str("\n/admin - Панель администратора");
                    }
                    Reply::text(text)
                }
                Err(e) => {
                    log::error!("Login error: {}", e);
                    Reply::text("Ошибка входа. Проверьте email и пароль.")
                }
            },

            TerminalAction::CreateMaterial(draft) => {
                let session = self.state.get_session(user.chat_id).await;
                let Some(token) = session.token.as_deref() else {
                    return Reply::text(LOGIN_REQUIRED);
                };
                match self.api.create_material(token, &draft).await {
                    Ok(_) => {
                        log::info!("✅ Material {:?} created", draft.title);
                        Reply::text("Материал успешно добавлен!")
                    }
                    Err(e) => {
                        log::error!("Error adding material: {}", e);
                        Reply::text(format!(
                            "Произошла ошибка при добавлении материала: {}",
                            e.user_message()
                        ))
                    }
                }
            }

            TerminalAction::UpdateMaterial { id, draft } => {
                let session = self.state.get_session(user.chat_id).await;
                let Some(token) = session.token.as_deref() else {
                    return Reply::text(LOGIN_REQUIRED);
                };
                match self.api.update_material(token, id, &draft).await {
                    Ok(_) => {
                        log::info!("✅ Material {} updated", id);
                        Reply::text("Материал успешно обновлен!")
                    }
                    Err(e) => {
                        log::error!("Error updating material {}: {}", id, e);
                        Reply::text(format!(
                            "Произошла ошибка при обновлении материала: {}",
                            e.user_message()
                        ))
                    }
                }
            }

            TerminalAction::AddComment { material_id, text } => {
                let session = self.state.get_session(user.chat_id).await;
                let comment = NewComment::new(text, session.email.as_deref());
                match self.api.add_comment(material_id, &comment).await {
                    Ok(_) => {
                        log::info!("💬 Comment added to material {}", material_id);
                        Reply::text("Комментарий добавлен!")
                    }
                    Err(e) => {
                        log::error!("Error adding comment to material {}: {}", material_id, e);
                        Reply::text(format!(
                            "Произошла ошибка при добавлении комментария: {}",
                            e.user_message()
                        ))
                    }
                }
            }
        }
    }
}
