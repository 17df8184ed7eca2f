pub mod table;

use crate::api::types::{LoginRequest, MaterialDraft, MaterialId, RegisterRequest, Role};
use crate::config::FlowRules;
use crate::models::{ConversationState, CredentialsStep};

/// Ввод "оставить без изменений" при редактировании
pub const SKIP_TOKEN: &str = "-";

pub const INVALID_EMAIL: &str = "❌ Неверный формат email. Попробуйте снова:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalAction {
    Register(RegisterRequest),
    Login(LoginRequest),
    CreateMaterial(MaterialDraft),
    UpdateMaterial {
        id: MaterialId,
        draft: MaterialDraft,
    },
    /// Автор подставляется из сессии при отправке
    AddComment {
        material_id: MaterialId,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Сценарий продолжается (в том числе повтор того же шага)
    Continue {
        state: ConversationState,
        prompt: String,
    },
    /// Сценарий завершён, состояние не возвращается в хранилище
    Finish(TerminalAction),
}

/// Минимальная проверка: есть "@" и "."
pub fn looks_like_email(text: &str) -> bool {
    text.contains('@') && text.contains('.')
}

pub fn infer_role(email: &str, rules: &FlowRules) -> Role {
    if email.starts_with(&rules.admin_email_prefix) {
        Role::Admin
    } else {
        Role::User
    }
}

/// Вопрос для текущего шага сценария
pub fn prompt_for(state: &ConversationState) -> String {
    match state {
        ConversationState::Register(CredentialsStep::AwaitingEmail) => {
            "Введите ваш email для регистрации:".to_string()
        }
        ConversationState::Register(CredentialsStep::AwaitingPassword { .. }) => {
            "Введите пароль для регистрации:".to_string()
        }
        ConversationState::Login(CredentialsStep::AwaitingEmail) => {
            "Введите ваш email для входа:".to_string()
        }
        ConversationState::Login(CredentialsStep::AwaitingPassword { .. }) => {
            "Введите пароль:".to_string()
        }
        ConversationState::AddMaterial { step, .. } => table::step(*step).prompt.to_string(),
        ConversationState::EditMaterial { step, draft, .. } => {
            let row = table::step(*step);
            format!(
                "{}: {}\n{} или отправьте \"{}\" чтобы оставить без изменений:",
                row.current_label,
                draft.get(*step),
                row.replace_prompt,
                SKIP_TOKEN
            )
        }
        ConversationState::AddComment { .. } => "Введите текст комментария:".to_string(),
    }
}

/// Один шаг автомата: текущее состояние + текст пользователя
pub fn advance(state: ConversationState, input: &str, rules: &FlowRules) -> Transition {
    match state {
        ConversationState::Register(CredentialsStep::AwaitingEmail) => {
            if !looks_like_email(input) {
                let state = ConversationState::register();
                let prompt = format!("{}\n{}", INVALID_EMAIL, prompt_for(&state));
                return Transition::Continue { state, prompt };
            }
            proceed(ConversationState::Register(CredentialsStep::AwaitingPassword {
                email: input.to_string(),
            }))
        }
        ConversationState::Register(CredentialsStep::AwaitingPassword { email }) => {
            let role = infer_role(&email, rules);
            Transition::Finish(TerminalAction::Register(RegisterRequest {
                email,
                password: input.to_string(),
                role,
            }))
        }
        ConversationState::Login(CredentialsStep::AwaitingEmail) => {
            proceed(ConversationState::Login(CredentialsStep::AwaitingPassword {
                email: input.to_string(),
            }))
        }
        ConversationState::Login(CredentialsStep::AwaitingPassword { email }) => {
            Transition::Finish(TerminalAction::Login(LoginRequest {
                email,
                password: input.to_string(),
            }))
        }
        ConversationState::AddMaterial { step, mut draft } => {
            draft.set(step, input);
            match table::next(step) {
                Some(next) => proceed(ConversationState::AddMaterial { step: next, draft }),
                None => Transition::Finish(TerminalAction::CreateMaterial(draft)),
            }
        }
        ConversationState::EditMaterial {
            material_id,
            step,
            mut draft,
        } => {
            if input != SKIP_TOKEN {
                draft.set(step, input);
            }
            match table::next(step) {
                Some(next) => proceed(ConversationState::EditMaterial {
                    material_id,
                    step: next,
                    draft,
                }),
                None => Transition::Finish(TerminalAction::UpdateMaterial {
                    id: material_id,
                    draft,
                }),
            }
        }
        ConversationState::AddComment { material_id } => {
            Transition::Finish(TerminalAction::AddComment {
                material_id,
                text: input.to_string(),
            })
        }
    }
}

fn proceed(state: ConversationState) -> Transition {
    let prompt = prompt_for(&state);
    Transition::Continue { state, prompt }
}
