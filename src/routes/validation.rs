use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::Deserialize;

use crate::constants::FORM_TRUE;
use crate::error::{AppError, Result};

/// JSON body extractor whose rejections surface as `AppError::InvalidFormat`
pub struct AppJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(AppJson(value))
    }
}

/// A submitted field that may arrive as JSON or as a form-style string
///
/// `12` and `"12"` are both accepted for numbers, `true` and `"True"` for
/// flags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Flag(bool),
    Number(i64),
    Text(String),
}

impl FormValue {
    /// Parse as an integer, failing with `InvalidFormat`
    pub fn to_int(&self, field: &str) -> Result<i64> {
        match self {
            FormValue::Number(n) => Ok(*n),
            FormValue::Text(s) => s.trim().parse().map_err(|_| {
                tracing::warn!("Malformed {} field: {:?}", field, s);
                AppError::InvalidFormat(format!("{field} must be an integer"))
            }),
            FormValue::Flag(_) => Err(AppError::InvalidFormat(format!(
                "{field} must be an integer"
            ))),
        }
    }

    /// Form flags are only set by the exact text `"True"`
    pub fn is_true(&self) -> bool {
        match self {
            FormValue::Flag(b) => *b,
            FormValue::Text(s) => s == FORM_TRUE,
            FormValue::Number(_) => false,
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            FormValue::Flag(b) => b.to_string(),
            FormValue::Number(n) => n.to_string(),
            FormValue::Text(s) => s.clone(),
        }
    }
}

/// Parse a required integer field
pub fn required_int(value: Option<&FormValue>, field: &str) -> Result<i64> {
    value
        .ok_or_else(|| AppError::InvalidFormat(format!("{field} is required")))?
        .to_int(field)
}

/// Absent flags are false
pub fn flag(value: Option<&FormValue>) -> bool {
    value.is_some_and(FormValue::is_true)
}
