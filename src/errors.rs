use std::sync::Arc;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::notes::QueryResult;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A statement matched no rows where exactly one was expected.
    #[error("not_found")]
    NotFound(QueryResult),

    /// A statement touched some row count other than one, for a reason
    /// beyond a plain missing row. Answers with the same status as
    /// NotFound for wire compatibility; kept separate so logs can tell
    /// them apart.
    #[error("row_count")]
    RowCount(QueryResult),

    #[error(transparent)]
    DB(#[from] crate::db::Error),

    #[error("unexpected")]
    Unexpected(String),
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct ErrorResponse {
    pub error: String,
    pub message: Option<String>,
    pub status: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, status: u16) -> Self {
        Self {
            error: error.into(),
            status,
            ..Default::default()
        }
    }

    pub fn with_message(&self, message: impl Into<String>) -> Self {
        let mut res = self.clone();
        res.message = Some(message.into());
        res
    }
}

impl From<&Error> for ErrorResponse {
    fn from(error: &Error) -> Self {
        match error {
            Error::NotFound(_) | Error::RowCount(_) => ErrorResponse::new("not_found", 404),
            Error::DB(db_error) => ErrorResponse::new("db", 500).with_message(db_error.to_string()),
            Error::Unexpected(message) => ErrorResponse::new("unexpected", 500).with_message(message),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // the row-count outcomes answer with the raw statement result,
        // everything else with the generic error body
        let mut res = match &self {
            Error::NotFound(result) | Error::RowCount(result) => {
                let mut res = axum::Json(result).into_response();
                *res.status_mut() = StatusCode::NOT_FOUND;
                res
            }
            error => {
                let error_res = ErrorResponse::from(error);
                let status = error_res.status;
                let mut res = axum::Json(error_res).into_response();
                *res.status_mut() = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                res
            }
        };

        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

pub async fn on_error(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    let error = response.extensions().get::<Arc<Error>>().map(Arc::as_ref);
    if let Some(error) = error {
        tracing::error!("{:?}", error);
    }

    response
}
