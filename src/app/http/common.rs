// ==========================================
// 公共工具：错误映射、阻塞调用
// ==========================================

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};

/// 错误响应（返回给前端）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn from_api_error(err: &ApiError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            details: match err {
                ApiError::InvalidStateTransition { from, to } => {
                    Some(serde_json::json!({ "from": from, "to": to }))
                }
                _ => None,
            },
        }
    }
}

/// ApiError → HTTP 状态码
pub fn status_for(err: &ApiError) -> StatusCode {
    match err {
        ApiError::InvalidInput(_) | ApiError::ImportError(_) => StatusCode::BAD_REQUEST,
        ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        ApiError::Conflict(_) | ApiError::InvalidStateTransition { .. } => StatusCode::CONFLICT,
        ApiError::BusinessRuleViolation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ApiError::DatabaseError(_)
        | ApiError::DatabaseTransactionError(_)
        | ApiError::ConfigError(_)
        | ApiError::InternalError(_)
        | ApiError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "请求处理失败");
        } else {
            tracing::debug!(code = self.code(), error = %self, "请求被拒绝");
        }
        (status, Json(ErrorResponse::from_api_error(&self))).into_response()
    }
}

/// 在阻塞线程池上执行同步 API 调用（SQLite 访问不占用异步线程）
pub async fn run_blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::InternalError(format!("任务执行失败: {}", e)))?
}
