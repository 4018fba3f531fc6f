// src/common/i18n.rs

use std::collections::HashMap;
use std::sync::Arc;

use crate::middleware::i18n::{Locale, DEFAULT_LANG};

// Catálogo de mensagens de erro exibidas ao usuário.
// Chave -> (fr, en). `{value}` é substituído pelo argumento da mensagem.
const MESSAGES: &[(&str, &str, &str)] = &[
    (
        "error.validation",
        "Un ou plusieurs filtres sont invalides.",
        "One or more filters are invalid.",
    ),
    (
        "error.invalid_body",
        "Le corps de la requête est invalide.",
        "The request body is invalid.",
    ),
    (
        "error.invalid_query",
        "Les paramètres de la requête sont invalides.",
        "The query parameters are invalid.",
    ),
    (
        "error.missing_date_range",
        "La plage de dates est requise.",
        "A date range is required.",
    ),
    (
        "error.incomplete_comparison_range",
        "La plage de dates de comparaison est incomplète.",
        "The comparison date range is incomplete.",
    ),
    (
        "error.unknown_dimension",
        "Dimension de regroupement inconnue : {value}.",
        "Unknown grouping dimension: {value}.",
    ),
    (
        "error.unknown_sort_column",
        "Colonne de tri inconnue : {value}.",
        "Unknown sort column: {value}.",
    ),
    (
        "error.product_not_found",
        "Produit introuvable : {value}.",
        "Product not found: {value}.",
    ),
    (
        "error.route_not_found",
        "Ressource introuvable.",
        "Resource not found.",
    ),
    (
        "error.method_not_allowed",
        "Méthode non autorisée.",
        "Method not allowed.",
    ),
    (
        "error.internal",
        "Une erreur interne est survenue.",
        "An internal error occurred.",
    ),
];

#[derive(Debug, Clone)]
pub struct I18nStore {
    // idioma -> (chave -> mensagem)
    catalogs: Arc<HashMap<&'static str, HashMap<&'static str, &'static str>>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut fr = HashMap::new();
        let mut en = HashMap::new();
        for (key, fr_msg, en_msg) in MESSAGES {
            fr.insert(*key, *fr_msg);
            en.insert(*key, *en_msg);
        }

        let mut catalogs = HashMap::new();
        catalogs.insert("fr", fr);
        catalogs.insert("en", en);

        Self {
            catalogs: Arc::new(catalogs),
        }
    }

    /// Idioma desconhecido ou chave ausente caem no francês; chave inexistente devolve a própria chave.
    pub fn translate(&self, locale: &Locale, key: &str, value: Option<&str>) -> String {
        let message = self
            .catalogs
            .get(locale.0.as_str())
            .and_then(|catalog| catalog.get(key))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|c| c.get(key)))
            .copied()
            .unwrap_or(key);

        match value {
            Some(v) => message.replace("{value}", v),
            None => message.to_string(),
        }
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_with_argument() {
        let store = I18nStore::new();
        let msg = store.translate(&Locale("en".into()), "error.unknown_dimension", Some("color"));
        assert_eq!(msg, "Unknown grouping dimension: color.");
    }

    #[test]
    fn unknown_language_falls_back_to_french() {
        let store = I18nStore::new();
        let msg = store.translate(&Locale("de".into()), "error.missing_date_range", None);
        assert_eq!(msg, "La plage de dates est requise.");
    }

    #[test]
    fn unknown_key_is_returned_as_is() {
        let store = I18nStore::new();
        assert_eq!(store.translate(&Locale::default(), "error.nope", None), "error.nope");
    }
}
