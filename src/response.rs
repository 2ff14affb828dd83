use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub status: String,
    pub payload: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(payload: T) -> Self {
        Self {
            status: "success".to_string(),
            payload: Some(payload),
        }
    }
}
