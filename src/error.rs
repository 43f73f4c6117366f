use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::pooled_connection::deadpool::PoolError;
use serde::Serialize;
use std::borrow::Cow;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(Cow<'static, str>),

    #[error("{0}")]
    Conflict(Cow<'static, str>),

    #[error("{0}")]
    NotFound(Cow<'static, str>),

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("{0}")]
    Storage(DieselError),

    #[error("{0}")]
    Pool(#[from] PoolError),

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(s: impl Into<Cow<'static, str>>) -> AppError {
        AppError::Validation(s.into())
    }

    pub fn conflict(s: impl Into<Cow<'static, str>>) -> AppError {
        AppError::Conflict(s.into())
    }

    pub fn not_found(s: impl Into<Cow<'static, str>>) -> AppError {
        AppError::NotFound(s.into())
    }

    /// Turns a unique-constraint violation into a [`AppError::Conflict`],
    /// picking the message registered for the violated constraint.
    pub fn on_unique(err: DieselError, constraints: &[(&str, &'static str)]) -> AppError {
        if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &err {
            let violated = info.constraint_name().unwrap_or_default();
            let message = constraints
                .iter()
                .find(|(name, _)| *name == violated)
                .map_or("Record already exists", |(_, message)| *message);
            return AppError::conflict(message);
        }
        AppError::from(err)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Storage(_) | AppError::Pool(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct AppErrorResponse {
            error: String,
        }

        let status = self.status();
        let error = match &self {
            AppError::Storage(e) => {
                tracing::error!("database error: {e}");
                e.to_string()
            }
            AppError::Pool(e) => {
                tracing::error!("pool error: {e}");
                e.to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("internal error: {e:#}");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(AppErrorResponse { error })).into_response()
    }
}

impl From<DieselError> for AppError {
    fn from(e: DieselError) -> AppError {
        match e {
            DieselError::NotFound => AppError::not_found("Record not found"),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                AppError::conflict("Record already exists")
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                AppError::not_found("Referenced record does not exist")
            }
            e => AppError::Storage(e),
        }
    }
}

impl From<password_hash::Error> for AppError {
    fn from(e: password_hash::Error) -> AppError {
        AppError::Internal(anyhow::anyhow!("password hashing failed: {e}"))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> AppError {
        AppError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> AppError {
        AppError::validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> AppError {
        AppError::validation(rejection.body_text())
    }
}
