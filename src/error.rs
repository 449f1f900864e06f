use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("missing field {0:?}")]
    MissingField(&'static str),

    #[error("invalid duration {0:?}")]
    InvalidDuration(String),

    #[error("invalid date_added {value:?}")]
    InvalidDate {
        value: String,
        #[source]
        source: jiff::Error,
    },

    #[error("invalid release_year {0:?}")]
    InvalidReleaseYear(String),

    #[error("malformed record: {0}")]
    Record(#[from] csv::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),

    #[error("failed to encode fields: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("stored title {id} is corrupt: {message}")]
    Decode { id: i32, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV header: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid load options: {0}")]
    InvalidOptions(String),

    #[error("CSV is missing required column {0:?}")]
    MissingColumn(&'static str),

    #[error("line {line}: {source}")]
    InvalidRow {
        line: usize,
        #[source]
        source: TransformError,
    },

    #[error("store write failed: {0}")]
    Store(#[from] StoreError),

    #[error("row reader task failed: {0}")]
    Producer(#[from] tokio::task::JoinError),
}

#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self(anyhow::Error::new(err))
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        let body = crate::templates::error_page(self.to_string());
        (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
