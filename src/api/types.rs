use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize};

pub type MaterialId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Любая строка кроме "admin" считается обычным пользователем
    pub fn parse(value: &str) -> Self {
        if value == "admin" {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub lecturer: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub homework: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub homework_due: String,
}

/// Тело запроса на создание/обновление материала: ровно семь полей
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MaterialDraft {
    pub subject: String,
    pub lecturer: String,
    pub title: String,
    pub content: String,
    pub homework: String,
    pub date: String,
    pub homework_due: String,
}

impl From<Material> for MaterialDraft {
    fn from(material: Material) -> Self {
        Self {
            subject: material.subject,
            lecturer: material.lecturer,
            title: material.title,
            content: material.content,
            homework: material.homework,
            date: material.date,
            homework_due: material.homework_due,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub material_id: MaterialId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub user_email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
}

/// Новый комментарий; бэкенд принимает его как multipart-форму
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub text: String,
    pub user_email: String,
}

/// Автор комментария, если пользователь не вошёл в систему
pub const ANONYMOUS_EMAIL: &str = "anon";

impl NewComment {
    pub fn new(text: impl Into<String>, user_email: Option<&str>) -> Self {
        Self {
            text: text.into(),
            user_email: user_email.unwrap_or(ANONYMOUS_EMAIL).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl LoginResponse {
    /// Роль из ответа, затем из claims токена, иначе "user"
    pub fn resolved_role(&self) -> Role {
        self.role
            .as_deref()
            .map(Role::parse)
            .or_else(|| role_from_token(&self.token))
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct TokenClaims {
    role: Option<String>,
}

/// Читает claim `role` из payload JWT без проверки подписи
pub fn role_from_token(token: &str) -> Option<Role> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: TokenClaims = serde_json::from_slice(&bytes).ok()?;
    claims.role.as_deref().map(Role::parse)
}
