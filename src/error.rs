use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Reasons a task or staff write is rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("タスク名を入力してください")]
    MissingTaskName,

    #[error("スタッフ名を入力してください")]
    MissingStaffName,

    #[error("{hour}時は選択できる時間帯(8時から22時)の範囲外です")]
    OutsideGrid { hour: i32 },

    #[error("終了時間は開始時間より後に設定してください ({start_hour}時-{end_hour}時)")]
    InvalidTimeRange { start_hour: i32, end_hour: i32 },

    #[error("この時間帯には既に別のタスクが登録されています ({staff_name}: {conflicting_task})")]
    TimeOverlap {
        staff_name: String,
        conflicting_task: String,
    },

    #[error("スタッフ「{0}」は既に登録されています")]
    DuplicateStaffName(String),

    #[error("月の指定が不正です: {0} (YYYY-MM)")]
    InvalidMonth(String),

    #[error("リクエストの形式が不正です: {0}")]
    MalformedRequest(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Staff member not found: {0}")]
    StaffNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid stored value: {0}")]
    Corrupt(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Coarse classification reported to API callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Backend,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::TaskNotFound(_) | AppError::StaffNotFound(_) => ErrorKind::NotFound,
            AppError::Database(_)
            | AppError::Io(_)
            | AppError::Json(_)
            | AppError::Corrupt(_)
            | AppError::InvalidConfig(_) => ErrorKind::Backend,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Failure half of the API's tagged result.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: bool,
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        ErrorBody {
            error: true,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Success half of the API's tagged result.
#[derive(Debug, Serialize)]
pub struct OkBody<T: Serialize> {
    pub ok: bool,
    pub value: T,
}

impl<T: Serialize> OkBody<T> {
    pub fn new(value: T) -> Self {
        OkBody { ok: true, value }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Backend => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody::from(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_variants() {
        assert_eq!(
            AppError::from(ValidationError::MissingTaskName).kind(),
            ErrorKind::Validation
        );
        assert_eq!(AppError::TaskNotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(AppError::Corrupt("bad".into()).kind(), ErrorKind::Backend);
    }

    #[test]
    fn error_body_is_tagged() {
        let err = AppError::from(ValidationError::InvalidTimeRange {
            start_hour: 10,
            end_hour: 9,
        });
        let body = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(body["error"], true);
        assert_eq!(body["kind"], "validation");
        assert!(body["message"].as_str().unwrap().contains("終了時間"));
    }

    #[test]
    fn status_codes_by_kind() {
        assert_eq!(
            AppError::StaffNotFound("s".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InvalidConfig("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
