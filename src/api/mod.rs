pub mod types;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::api::types::{
    Comment, LoginRequest, LoginResponse, Material, MaterialDraft, MaterialId, NewComment,
    RegisterRequest,
};

const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API Error {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            ApiError::Decode(_) => None,
        }
    }

    /// Сообщение для пользователя: текст из ответа API либо общий
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Transport(_) => "Сервис недоступен".to_string(),
            ApiError::Decode(_) => "Некорректный ответ сервиса".to_string(),
        }
    }
}

/// Операции REST API портала, которыми пользуется бот
#[async_trait]
pub trait MaterialsApi: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> Result<Option<String>, ApiError>;
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;
    async fn list_materials(&self) -> Result<Vec<Material>, ApiError>;
    async fn get_material(&self, id: MaterialId) -> Result<Material, ApiError>;
    async fn create_material(
        &self,
        token: &str,
        draft: &MaterialDraft,
    ) -> Result<Option<String>, ApiError>;
    async fn update_material(
        &self,
        token: &str,
        id: MaterialId,
        draft: &MaterialDraft,
    ) -> Result<Option<String>, ApiError>;
    async fn delete_material(&self, token: &str, id: MaterialId)
        -> Result<Option<String>, ApiError>;
    async fn list_comments(&self, id: MaterialId) -> Result<Vec<Comment>, ApiError>;
    async fn add_comment(
        &self,
        id: MaterialId,
        comment: &NewComment,
    ) -> Result<Option<String>, ApiError>;
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn builder(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("➡️ {} {}", method, url);

        let request = self
            .http
            .request(method, url.as_str())
            .header("Accept", "application/json");
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Единая точка вызова API: метод, путь, токен, тело -> JSON ответа или ApiError
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let mut request = self.builder(method, path, token);
        if let Some(body) = body {
            request = request.json(&body);
        }
        read_response(request.send().await?).await
    }

    async fn request_as<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let value = self.request(method, path, token, body).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn request_message(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<Option<String>, ApiError> {
        let value = self.request(method, path, token, body).await?;
        Ok(message_of(&value))
    }
}

async fn read_response(response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<Value>(&bytes)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
        return Err(ApiError::Status { status, message });
    }

    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&bytes)?)
}

fn message_of(value: &Value) -> Option<String> {
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[async_trait]
impl MaterialsApi for ApiClient {
    async fn register(&self, request: &RegisterRequest) -> Result<Option<String>, ApiError> {
        let body = serde_json::to_value(request)?;
        self.request_message(Method::POST, "/auth/register", None, Some(body))
            .await
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let body = serde_json::to_value(request)?;
        self.request_as(Method::POST, "/auth/login", None, Some(body))
            .await
    }

    async fn list_materials(&self) -> Result<Vec<Material>, ApiError> {
        let value = self.request(Method::GET, "/materials", None, None).await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(value)?)
    }

    async fn get_material(&self, id: MaterialId) -> Result<Material, ApiError> {
        self.request_as(Method::GET, &format!("/materials/{}", id), None, None)
            .await
    }

    async fn create_material(
        &self,
        token: &str,
        draft: &MaterialDraft,
    ) -> Result<Option<String>, ApiError> {
        let body = serde_json::to_value(draft)?;
        self.request_message(Method::POST, "/materials", Some(token), Some(body))
            .await
    }

    async fn update_material(
        &self,
        token: &str,
        id: MaterialId,
        draft: &MaterialDraft,
    ) -> Result<Option<String>, ApiError> {
        let body = serde_json::to_value(draft)?;
        self.request_message(
            Method::PUT,
            &format!("/materials/{}", id),
            Some(token),
            Some(body),
        )
        .await
    }

    async fn delete_material(
        &self,
        token: &str,
        id: MaterialId,
    ) -> Result<Option<String>, ApiError> {
        self.request_message(Method::DELETE, &format!("/materials/{}", id), Some(token), None)
            .await
    }

    async fn list_comments(&self, id: MaterialId) -> Result<Vec<Comment>, ApiError> {
        let value = self
            .request(Method::GET, &format!("/materials/{}/comments", id), None, None)
            .await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(value)?)
    }

    async fn add_comment(
        &self,
        id: MaterialId,
        comment: &NewComment,
    ) -> Result<Option<String>, ApiError> {
        // Маршрут комментариев принимает только multipart (поле file необязательно)
        let form = Form::new()
            .text("text", comment.text.clone())
            .text("user_email", comment.user_email.clone());
        let request = self
            .builder(Method::POST, &format!("/materials/{}/comments", id), None)
            .multipart(form);
        let value = read_response(request.send().await?).await?;
        Ok(message_of(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Role;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string_contains, header, header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_draft() -> MaterialDraft {
        MaterialDraft {
            subject: "Математика".to_string(),
            lecturer: "Иванов И.И.".to_string(),
            title: "Пределы".to_string(),
            content: "Определение предела".to_string(),
            homework: "№1-5".to_string(),
            date: "2024-09-01".to_string(),
            homework_due: "2024-09-08".to_string(),
        }
    }

    #[tokio::test]
    async fn login_posts_credentials_and_parses_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({"email": "a@b.c", "password": "secret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "jwt", "role": "admin"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let response = client
            .login(&LoginRequest {
                email: "a@b.c".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.token, "jwt");
        assert_eq!(response.resolved_role(), Role::Admin);
    }

    #[tokio::test]
    async fn register_sends_inferred_role() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .and(body_json(json!({"email": "admin@uni.ru", "password": "p", "role": "admin"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Registered"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let message = client
            .register(&RegisterRequest {
                email: "admin@uni.ru".to_string(),
                password: "p".to_string(),
                role: Role::Admin,
            })
            .await
            .unwrap();

        assert_eq!(message.as_deref(), Some("Registered"));
    }

    #[tokio::test]
    async fn create_material_sends_bearer_and_snake_case_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/materials"))
            .and(header("Authorization", "Bearer tok"))
            .and(body_json(json!({
                "subject": "Математика",
                "lecturer": "Иванов И.И.",
                "title": "Пределы",
                "content": "Определение предела",
                "homework": "№1-5",
                "date": "2024-09-01",
                "homework_due": "2024-09-08"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Material created"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let message = client.create_material("tok", &sample_draft()).await.unwrap();
        assert_eq!(message.as_deref(), Some("Material created"));
    }

    #[tokio::test]
    async fn error_status_carries_message_from_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/materials/5"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "Forbidden"})))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client.delete_material("tok", 5).await.unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
        assert_eq!(err.user_message(), "Forbidden");
        assert_eq!(err.to_string(), "API Error 403 Forbidden: Forbidden");
    }

    #[tokio::test]
    async fn error_without_json_body_uses_generic_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/materials/9"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client.get_material(9).await.unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(err.user_message(), UNKNOWN_ERROR);
    }

    #[tokio::test]
    async fn failed_call_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/materials/2"))
            .respond_with(ResponseTemplate::new(502))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        assert!(client.update_material("tok", 2, &sample_draft()).await.is_err());
    }

    #[tokio::test]
    async fn lists_materials_and_comments() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/materials"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": 1, "subject": "s", "lecturer": "l", "title": "t",
                "content": "c", "homework": "h", "date": "2024-01-01", "homework_due": "2024-01-02"
            }])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/materials/1/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": 10, "material_id": 1, "user_email": "anon", "text": "Спасибо",
                "file_path": null, "created_at": "2024-01-03T10:00:00.000Z"
            }])))
            .mount(&server)
            .await;

        let client = ApiClient::new(format!("{}/", server.uri()));
        let materials = client.list_materials().await.unwrap();
        let comments = client.list_comments(1).await.unwrap();

        assert_eq!(materials.len(), 1);
        assert_eq!(materials[0].homework_due, "2024-01-02");
        assert_eq!(comments[0].text, "Спасибо");
    }

    #[tokio::test]
    async fn add_comment_posts_multipart_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/materials/4/comments"))
            .and(header_regex("content-type", "^multipart/form-data; boundary="))
            .and(body_string_contains("name=\"text\"\r\n\r\nГде слайды?"))
            .and(body_string_contains("name=\"user_email\"\r\n\r\nanon"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"message": "Комментарий добавлен"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let message = client
            .add_comment(4, &NewComment::new("Где слайды?", None))
            .await
            .unwrap();

        assert_eq!(message.as_deref(), Some("Комментарий добавлен"));
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        let client = ApiClient::new("http://127.0.0.1:9");
        let err = client.list_materials().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
