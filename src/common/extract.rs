// src/common/extract.rs

use axum::{
    extract::{FromRef, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
};

// ---
// Extratores que já devolvem o nosso ApiError (400 + { error }) em vez das
// rejeições padrão do axum (422 / texto puro).
// ---

/// Corpo JSON desserializado e validado (`validator`).
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(req.headers());

        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::InvalidBody(rejection.body_text())
                    .to_api_error(&locale, &app_state.i18n_store)
            })?;

        value
            .validate()
            .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

        Ok(ValidatedJson(value))
    }
}

/// Query string com chaves repetidas (`brands=A&brands=B`), validada.
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(&parts.headers);

        let axum_extra::extract::Query(value) =
            axum_extra::extract::Query::<T>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| {
                    AppError::InvalidQuery(rejection.to_string())
                        .to_api_error(&locale, &app_state.i18n_store)
                })?;

        value
            .validate()
            .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

        Ok(ValidatedQuery(value))
    }
}
