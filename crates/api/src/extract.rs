//! Extractors whose rejections use the API error envelope.
//!
//! Axum's stock `Json`, `Path` and `Query` reject with plain-text bodies;
//! these wrappers route the rejection through [`AppError`] instead.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body. Malformed or mistyped bodies become a 400.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path parameters. Unparseable segments (e.g. a non-numeric id) become a 400.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Query string parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
