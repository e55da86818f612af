use axum::{
    Form, Json,
    extract::{
        FromRequest, Request,
        rejection::{FormRejection, JsonRejection},
    },
    http::{StatusCode, header::CONTENT_TYPE},
};
use serde::de::DeserializeOwned;

use crate::error::RollcallError;
use crate::types::Validate;

/// JSON body that has been decoded and passed [`Validate`].
/// Both malformed JSON and failed field checks surface as `VALIDATION_ERROR`.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = RollcallError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| body_error(rejection.status(), rejection.body_text()))?;
        body.validate()?;
        Ok(ValidJson(body))
    }
}

/// Like [`ValidJson`], but also takes `application/x-www-form-urlencoded`,
/// which is what browser login forms post.
pub struct ValidJsonOrForm<T>(pub T);

impl<S, T> FromRequest<S> for ValidJsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = RollcallError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if !is_form {
            let ValidJson(body) = ValidJson::<T>::from_request(req, state).await?;
            return Ok(ValidJsonOrForm(body));
        }

        let Form(body) = Form::<T>::from_request(req, state)
            .await
            .map_err(|rejection: FormRejection| body_error(rejection.status(), rejection.body_text()))?;
        body.validate()?;
        Ok(ValidJsonOrForm(body))
    }
}

fn body_error(status: StatusCode, message: String) -> RollcallError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        RollcallError::PayloadTooLarge
    } else {
        RollcallError::Validation(message)
    }
}
