use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use models::review::ReviewInput;

use crate::errors::JsonApiError;

/// Review body sent either as JSON or as a urlencoded HTML form.
#[derive(Debug)]
pub struct ReviewPayload(pub ReviewInput);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

#[async_trait]
impl<S> FromRequest<S> for ReviewPayload
where
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(input) = Form::<ReviewInput>::from_request(req, state)
                .await
                .map_err(|e| JsonApiError::new(e.status(), "Invalid Body", Some(e.body_text())))?;
            Ok(Self(input))
        } else {
            let Json(input) = Json::<ReviewInput>::from_request(req, state)
                .await
                .map_err(|e| JsonApiError::new(e.status(), "Invalid Body", Some(e.body_text())))?;
            Ok(Self(input))
        }
    }
}
