use std::fmt;

use crate::api::types::{Material, MaterialDraft, MaterialId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowKind {
    Register,
    Login,
    AddMaterial,
    EditMaterial,
    AddComment,
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowKind::Register => "register",
            FlowKind::Login => "login",
            FlowKind::AddMaterial => "add_material",
            FlowKind::EditMaterial => "edit_material",
            FlowKind::AddComment => "add_comment",
        };
        f.write_str(name)
    }
}

/// Поля материала в порядке опроса
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Subject = 0,
    Lecturer = 1,
    Title = 2,
    Content = 3,
    Homework = 4,
    Date = 5,
    HomeworkDue = 6,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Subject,
        Field::Lecturer,
        Field::Title,
        Field::Content,
        Field::Homework,
        Field::Date,
        Field::HomeworkDue,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn key(self) -> &'static str {
        match self {
            Field::Subject => "subject",
            Field::Lecturer => "lecturer",
            Field::Title => "title",
            Field::Content => "content",
            Field::Homework => "homework",
            Field::Date => "date",
            Field::HomeworkDue => "homework_due",
        }
    }
}

impl MaterialDraft {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Subject => &self.subject,
            Field::Lecturer => &self.lecturer,
            Field::Title => &self.title,
            Field::Content => &self.content,
            Field::Homework => &self.homework,
            Field::Date => &self.date,
            Field::HomeworkDue => &self.homework_due,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Subject => &mut self.subject,
            Field::Lecturer => &mut self.lecturer,
            Field::Title => &mut self.title,
            Field::Content => &mut self.content,
            Field::Homework => &mut self.homework,
            Field::Date => &mut self.date,
            Field::HomeworkDue => &mut self.homework_due,
        };
        *slot = value.into();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsStep {
    AwaitingEmail,
    AwaitingPassword { email: String },
}

/// Активный пошаговый сценарий пользователя (не более одного на user id)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationState {
    Register(CredentialsStep),
    Login(CredentialsStep),
    AddMaterial {
        step: Field,
        draft: MaterialDraft,
    },
    EditMaterial {
        material_id: MaterialId,
        step: Field,
        draft: MaterialDraft,
    },
    /// Один шаг: текст комментария
    AddComment { material_id: MaterialId },
}

impl ConversationState {
    pub fn register() -> Self {
        ConversationState::Register(CredentialsStep::AwaitingEmail)
    }

    pub fn login() -> Self {
        ConversationState::Login(CredentialsStep::AwaitingEmail)
    }

    pub fn add_material() -> Self {
        ConversationState::AddMaterial {
            step: Field::Subject,
            draft: MaterialDraft::default(),
        }
    }

    /// Черновик заполняется текущими значениями материала
    pub fn edit_material(material: Material) -> Self {
        ConversationState::EditMaterial {
            material_id: material.id,
            step: Field::Subject,
            draft: material.into(),
        }
    }

    pub fn add_comment(material_id: MaterialId) -> Self {
        ConversationState::AddComment { material_id }
    }

    pub fn flow_kind(&self) -> FlowKind {
        match self {
            ConversationState::Register(_) => FlowKind::Register,
            ConversationState::Login(_) => FlowKind::Login,
            ConversationState::AddMaterial { .. } => FlowKind::AddMaterial,
            ConversationState::EditMaterial { .. } => FlowKind::EditMaterial,
            ConversationState::AddComment { .. } => FlowKind::AddComment,
        }
    }

    pub fn step_name(&self) -> &'static str {
        match self {
            ConversationState::Register(step) | ConversationState::Login(step) => match step {
                CredentialsStep::AwaitingEmail => "awaiting_email",
                CredentialsStep::AwaitingPassword { .. } => "awaiting_password",
            },
            ConversationState::AddMaterial { step, .. }
            | ConversationState::EditMaterial { step, .. } => step.key(),
            ConversationState::AddComment { .. } => "awaiting_text",
        }
    }
}
