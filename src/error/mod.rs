//! Error types for the Gridiron server application.
//!
//! Domain-specific error enums are aggregated into a single [`Error`] via
//! `thiserror`'s `#[from]`, and every error maps to an HTTP response for the
//! Axum layer. Entitlement denial is deliberately *not* an error; it is a
//! value returned by the entitlement service.

pub mod config;
pub mod retry;
pub mod trade;
pub mod transport;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    error::{config::ConfigError, trade::TradeError, transport::TransportError},
    model::api::ErrorDto,
};

/// Main error type for the Gridiron server application.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Remote host transport error (network, retries exhausted, auth expiry).
    #[error(transparent)]
    TransportError(#[from] TransportError),
    /// Trade validation error (bad selection, unowned asset).
    #[error(transparent)]
    TradeError(#[from] TradeError),
    /// A remote payload could not be parsed at all.
    ///
    /// Shape quirks inside an otherwise well-formed payload degrade to empty
    /// results in the parsers; this variant is reserved for byte streams that
    /// are not XML to begin with.
    #[error("Failed to parse remote payload: {0}")]
    ParseError(String),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Internal error indicating a bug in Gridiron's code.
    #[error("Internal error, please open a GitHub issue as this indicates a bug: {0:?}")]
    InternalError(String),
}

/// Converts application errors into HTTP responses.
///
/// Auth expiry against the remote platform is surfaced as 409 so the web
/// layer can prompt the user to re-link their account instead of retrying;
/// validation errors are 400; everything else is a logged 500.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::TransportError(TransportError::AuthExpired) => (
                StatusCode::CONFLICT,
                Json(ErrorDto {
                    error: "Remote session expired. Please re-link your account.".to_string(),
                }),
            )
                .into_response(),
            Self::TradeError(err) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorDto {
                    error: err.to_string(),
                }),
            )
                .into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper converting any displayable error into a 500 response.
///
/// The full error is logged; the client gets a generic message so internal
/// details never leak.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}
