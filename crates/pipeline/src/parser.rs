//! Menu parser.
//!
//! Sends the raw menu text to the text backend constrained to a JSON
//! array of dish-name strings and parses the result. Every failure mode
//! (backend error, malformed JSON) collapses into [`MenuParseError`]; the
//! specific cause is deliberately not distinguishable to callers. An
//! empty dish list is not an error at this layer.

use menushot_genai::api::GenAiError;
use menushot_genai::backend::{GenAiBackend, TextRequest, TextResponseFormat};

use crate::MENU_PARSING_MODEL;

/// The single collapsed failure for menu parsing.
#[derive(Debug, thiserror::Error)]
#[error("Failed to understand the menu. Please provide a clearer list of dishes.")]
pub struct MenuParseError;

/// Parse free-form menu text into a list of dish names.
pub async fn parse_menu(
    backend: &dyn GenAiBackend,
    menu_text: &str,
) -> Result<Vec<String>, MenuParseError> {
    let prompt = format!(
        "Parse the following restaurant menu text and return a JSON array of strings, \
         where each string is a dish name. Only include the dish names, no prices or \
         descriptions. Menu:\n\n{menu_text}"
    );

    let response = backend
        .generate_text(TextRequest {
            model: MENU_PARSING_MODEL.to_string(),
            prompt,
            format: TextResponseFormat::JsonStringArray,
        })
        .await
        .map_err(|e: GenAiError| {
            tracing::warn!(error = %e, "Menu parsing backend call failed");
            MenuParseError
        })?;

    serde_json::from_str::<Vec<String>>(response.trim()).map_err(|e| {
        tracing::warn!(error = %e, "Menu parser returned malformed JSON");
        MenuParseError
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use menushot_genai::mock::MockBackend;

    #[tokio::test]
    async fn parses_a_json_array_of_names() {
        let mock = MockBackend::new();
        mock.push_text(Ok(r#" ["Spaghetti Carbonara", "Caesar Salad"] "#.to_string()));

        let names = parse_menu(&mock, "Spaghetti Carbonara - $18\nCaesar Salad - $12")
            .await
            .expect("should parse");
        assert_eq!(names, vec!["Spaghetti Carbonara", "Caesar Salad"]);
    }

    #[tokio::test]
    async fn empty_array_is_not_an_error_here() {
        let mock = MockBackend::new();
        mock.push_text(Ok("[]".to_string()));

        let names = parse_menu(&mock, "opening hours: 9-5").await.expect("should parse");
        assert!(names.is_empty());
    }

    #[tokio::test]
    async fn backend_failure_collapses_to_the_domain_error() {
        let mock = MockBackend::new();
        mock.push_text(Err(GenAiError::Api {
            status: 500,
            status_code: None,
            message: "internal".to_string(),
        }));

        let err = parse_menu(&mock, "menu").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to understand the menu. Please provide a clearer list of dishes."
        );
    }

    #[tokio::test]
    async fn malformed_json_collapses_to_the_domain_error() {
        let mock = MockBackend::new();
        mock.push_text(Ok("Sure! Here are the dishes:".to_string()));

        assert!(parse_menu(&mock, "menu").await.is_err());
    }

    #[tokio::test]
    async fn request_is_constrained_to_a_string_array() {
        let mock = MockBackend::new();
        mock.push_text(Ok("[]".to_string()));
        let _ = parse_menu(&mock, "menu").await;

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            menushot_genai::mock::RecordedCall::Text { request, .. } => {
                assert_eq!(request.model, MENU_PARSING_MODEL);
                assert_eq!(request.format, TextResponseFormat::JsonStringArray);
                assert!(request.prompt.contains("no prices or descriptions"));
            }
            other => panic!("Expected a text call, got {other:?}"),
        }
    }
}
