//! Подменный API для тестов диспетчера: запоминает вызовы, отвечает заготовками

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::api::types::{
    Comment, LoginRequest, LoginResponse, Material, MaterialDraft, MaterialId, NewComment,
    RegisterRequest,
};
use crate::api::{ApiError, MaterialsApi};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Register(RegisterRequest),
    Login(LoginRequest),
    ListMaterials,
    GetMaterial(MaterialId),
    Create { token: String, draft: MaterialDraft },
    Update { token: String, id: MaterialId, draft: MaterialDraft },
    Delete { token: String, id: MaterialId },
    ListComments(MaterialId),
    AddComment { id: MaterialId, comment: NewComment },
}

#[derive(Default)]
pub struct FakeApi {
    pub calls: Mutex<Vec<ApiCall>>,
    pub materials: Vec<Material>,
    pub comments: Vec<Comment>,
    /// None -> логин отклоняется с 401
    pub login: Option<LoginResponse>,
    /// Все изменяющие запросы отвечают ошибкой
    pub reject_writes: bool,
    /// Получение материала отвечает 500
    pub reject_reads: bool,
}

impl FakeApi {
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn rejected(status: StatusCode, message: &str) -> ApiError {
        ApiError::Status {
            status,
            message: message.to_string(),
        }
    }

    fn write_result(&self, ok: &str) -> Result<Option<String>, ApiError> {
        if self.reject_writes {
            Err(Self::rejected(StatusCode::INTERNAL_SERVER_ERROR, "Database is down"))
        } else {
            Ok(Some(ok.to_string()))
        }
    }
}

#[async_trait]
impl MaterialsApi for FakeApi {
    async fn register(&self, request: &RegisterRequest) -> Result<Option<String>, ApiError> {
        self.record(ApiCall::Register(request.clone()));
        self.write_result("Registered")
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.record(ApiCall::Login(request.clone()));
        self.login
            .clone()
            .ok_or_else(|| Self::rejected(StatusCode::UNAUTHORIZED, "Invalid password"))
    }

    async fn list_materials(&self) -> Result<Vec<Material>, ApiError> {
        self.record(ApiCall::ListMaterials);
        Ok(self.materials.clone())
    }

    async fn get_material(&self, id: MaterialId) -> Result<Material, ApiError> {
        self.record(ApiCall::GetMaterial(id));
        if self.reject_reads {
            return Err(Self::rejected(StatusCode::INTERNAL_SERVER_ERROR, "Database is down"));
        }
        self.materials
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| Self::rejected(StatusCode::NOT_FOUND, "Material not found"))
    }

    async fn create_material(
        &self,
        token: &str,
        draft: &MaterialDraft,
    ) -> Result<Option<String>, ApiError> {
        self.record(ApiCall::Create {
            token: token.to_string(),
            draft: draft.clone(),
        });
        self.write_result("Material created")
    }

    async fn update_material(
        &self,
        token: &str,
        id: MaterialId,
        draft: &MaterialDraft,
    ) -> Result<Option<String>, ApiError> {
        self.record(ApiCall::Update {
            token: token.to_string(),
            id,
            draft: draft.clone(),
        });
        self.write_result("Material updated")
    }

    async fn delete_material(
        &self,
        token: &str,
        id: MaterialId,
    ) -> Result<Option<String>, ApiError> {
        self.record(ApiCall::Delete {
            token: token.to_string(),
            id,
        });
        self.write_result("Material deleted")
    }

    async fn list_comments(&self, id: MaterialId) -> Result<Vec<Comment>, ApiError> {
        self.record(ApiCall::ListComments(id));
        Ok(self
            .comments
            .iter()
            .filter(|c| c.material_id == id)
            .cloned()
            .collect())
    }

    async fn add_comment(
        &self,
        id: MaterialId,
        comment: &NewComment,
    ) -> Result<Option<String>, ApiError> {
        self.record(ApiCall::AddComment {
            id,
            comment: comment.clone(),
        });
        self.write_result("Комментарий добавлен")
    }
}
