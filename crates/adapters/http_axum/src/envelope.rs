//! The uniform response envelope.
//!
//! Success: `{"code":1,"msg":..,"time":..,"data":..}`.
//! Failure: `{"code":0,"msg":..,"time":..}`, built by [`crate::error::ApiError`].

use std::borrow::Cow;

use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use community_domain::time::now;

/// A successful answer. `data` is `null` when `T` is `()`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    code: u8,
    msg: Cow<'static, str>,
    time: i64,
    data: T,
}

impl<T> Envelope<T> {
    pub fn ok(msg: impl Into<Cow<'static, str>>, data: T) -> Self {
        Self {
            code: 1,
            msg: msg.into(),
            time: now().timestamp(),
            data,
        }
    }

    #[must_use]
    pub fn data(&self) -> &T {
        &self.data
    }
}

impl Envelope<()> {
    /// A success without payload.
    pub fn done(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::ok(msg, ())
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Failure<'a> {
    code: u8,
    msg: &'a str,
    time: i64,
}

impl<'a> Failure<'a> {
    pub(crate) fn new(msg: &'a str) -> Self {
        Self {
            code: 0,
            msg,
            time: now().timestamp(),
        }
    }
}
