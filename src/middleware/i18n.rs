// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};

pub const DEFAULT_LANG: &str = "fr";

// Extrator de idioma (Accept-Language). Os usuários são farmácias francesas,
// então o padrão é "fr".
#[derive(Debug, Clone, PartialEq)]
pub struct Locale(pub String);

impl Locale {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let lang = headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .and_then(|header_str| {
                accept_language::parse(header_str)
                    .first() // Pega o idioma preferido (ex: "fr-FR")
                    .map(|tag_string| {
                        // "fr-FR" -> "fr"
                        tag_string.split('-').next().unwrap_or(tag_string).to_lowercase()
                    })
            })
            .unwrap_or_else(|| DEFAULT_LANG.to_string());

        Locale(lang)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANG.to_string())
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(Locale::from_headers(&parts.headers))
    }
}
