//! Integration tests for the photo-shoot run loop: request pacing,
//! per-dish failure isolation, and run-level aborts.

mod common;

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use common::{menu_json, shoot_pipeline};
use menushot_core::style::PhotoStyle;
use menushot_genai::api::{parse_error_body, GenAiError};
use menushot_genai::backend::InlineImage;
use menushot_genai::mock::MockBackend;
use menushot_pipeline::driver::RunError;
use menushot_pipeline::events::DishEvent;
use menushot_pipeline::generator::RATE_LIMIT_MESSAGE;
use tokio::sync::broadcast;

fn drain_events(rx: &mut broadcast::Receiver<DishEvent>) -> Vec<DishEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// ---------------------------------------------------------------------------
// Request pacing
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn issues_one_generation_call_per_dish_with_fixed_spacing() {
    let mock = Arc::new(MockBackend::new());
    mock.push_text(Ok(menu_json(&["Soup", "Salad", "Ramen"])));
    let pipeline = shoot_pipeline(&mock);

    pipeline
        .run_menu("Soup - $5\nSalad - $7\nRamen - $12", PhotoStyle::BrightModern)
        .await
        .expect("run should succeed");

    let instants = mock.image_call_instants();
    assert_eq!(instants.len(), 3, "exactly one generation call per dish");
    // N dishes mean N-1 inter-call delays of exactly the configured length.
    assert_eq!(instants[1].duration_since(instants[0]), Duration::from_secs(10));
    assert_eq!(instants[2].duration_since(instants[1]), Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn spacing_is_kept_even_when_calls_fail() {
    let mock = Arc::new(MockBackend::new());
    mock.push_text(Ok(menu_json(&["Soup", "Salad", "Ramen"])));
    mock.push_images(Err(GenAiError::Api {
        status: 500,
        status_code: None,
        message: "backend exploded".to_string(),
    }));
    mock.push_images(Err(GenAiError::Api {
        status: 500,
        status_code: None,
        message: "backend exploded".to_string(),
    }));
    let pipeline = shoot_pipeline(&mock);

    pipeline
        .run_menu("menu", PhotoStyle::BrightModern)
        .await
        .expect("run level still succeeds");

    let instants = mock.image_call_instants();
    assert_eq!(instants.len(), 3);
    assert_eq!(instants[1].duration_since(instants[0]), Duration::from_secs(10));
    assert_eq!(instants[2].duration_since(instants[1]), Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn delay_paces_issuance_not_completion() {
    let mock = Arc::new(MockBackend::new());
    mock.push_text(Ok(menu_json(&["Slow Roast", "Quick Salad"])));
    // The first dish's backend call takes 25 s, far longer than the delay.
    mock.push_images_after(
        Duration::from_secs(25),
        Ok(vec![InlineImage {
            base64_data: "c2xvdw==".to_string(),
            mime_type: "image/jpeg".to_string(),
        }]),
    );
    let pipeline = shoot_pipeline(&mock);
    let mut rx = pipeline.subscribe();

    pipeline
        .run_menu("menu", PhotoStyle::RusticDark)
        .await
        .expect("run should succeed");

    // The second request went out 10 s after the first even though the
    // first call was still pending at that point.
    let instants = mock.image_call_instants();
    assert_eq!(instants.len(), 2);
    assert_eq!(instants[1].duration_since(instants[0]), Duration::from_secs(10));

    // The fast dish therefore finished before the slow one.
    let dishes = pipeline.board().snapshot().await;
    let slow_id = dishes[0].id;
    let quick_id = dishes[1].id;
    let completions: Vec<_> = drain_events(&mut rx)
        .into_iter()
        .filter_map(|e| match e {
            DishEvent::DishCompleted { dish_id } => Some(dish_id),
            _ => None,
        })
        .collect();
    assert_eq!(completions, vec![quick_id, slow_id]);

    // Both still ended in the success state.
    assert!(dishes.iter().all(|d| d.has_original_image()));
}

// ---------------------------------------------------------------------------
// Per-dish failure isolation
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn failing_dish_never_contaminates_siblings() {
    let mock = Arc::new(MockBackend::new());
    mock.push_text(Ok(menu_json(&["Soup", "Salad", "Ramen"])));
    mock.push_images(Ok(vec![InlineImage {
        base64_data: "c291cA==".to_string(),
        mime_type: "image/jpeg".to_string(),
    }]));
    mock.push_images(Err(GenAiError::Api {
        status: 400,
        status_code: Some("INVALID_ARGUMENT".to_string()),
        message: "prompt rejected".to_string(),
    }));
    mock.push_images(Ok(vec![InlineImage {
        base64_data: "cmFtZW4=".to_string(),
        mime_type: "image/jpeg".to_string(),
    }]));
    let pipeline = shoot_pipeline(&mock);

    pipeline
        .run_menu("menu", PhotoStyle::BrightModern)
        .await
        .expect("run should succeed despite the middle dish");

    let dishes = pipeline.board().snapshot().await;
    assert_eq!(dishes.len(), 3);

    assert_eq!(dishes[0].name, "Soup");
    assert_eq!(dishes[0].original_image, "data:image/jpeg;base64,c291cA==");
    assert!(dishes[0].error.is_none());
    assert!(!dishes[0].is_generating);

    assert_eq!(dishes[1].name, "Salad");
    assert!(dishes[1].original_image.is_empty());
    assert!(dishes[1].image_prompt.is_empty());
    assert_eq!(dishes[1].error.as_deref(), Some("prompt rejected"));
    assert!(!dishes[1].is_generating);

    assert_eq!(dishes[2].name, "Ramen");
    assert_eq!(dishes[2].original_image, "data:image/jpeg;base64,cmFtZW4=");
    assert!(dishes[2].error.is_none());
    assert!(!dishes[2].is_generating);
}

#[tokio::test(start_paused = true)]
async fn resource_exhausted_surfaces_the_fixed_rate_limit_message() {
    let mock = Arc::new(MockBackend::new());
    mock.push_text(Ok(menu_json(&["Soup"])));
    mock.push_images(Err(parse_error_body(
        429,
        r#"{"error":{"status":"RESOURCE_EXHAUSTED"}}"#,
    )));
    let pipeline = shoot_pipeline(&mock);

    pipeline
        .run_menu("menu", PhotoStyle::BrightModern)
        .await
        .expect("run level still succeeds");

    let dishes = pipeline.board().snapshot().await;
    assert_eq!(dishes[0].error.as_deref(), Some(RATE_LIMIT_MESSAGE));
}

#[tokio::test(start_paused = true)]
async fn zero_images_from_the_backend_fails_only_that_dish() {
    let mock = Arc::new(MockBackend::new());
    mock.push_text(Ok(menu_json(&["Soup", "Salad"])));
    mock.push_images(Ok(vec![]));
    let pipeline = shoot_pipeline(&mock);

    pipeline
        .run_menu("menu", PhotoStyle::BrightModern)
        .await
        .expect("run should succeed");

    let dishes = pipeline.board().snapshot().await;
    assert_eq!(
        dishes[0].error.as_deref(),
        Some("Image generation failed, no images returned.")
    );
    assert!(dishes[1].has_original_image());
}

// ---------------------------------------------------------------------------
// Run-level aborts
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn empty_menu_contacts_no_backend() {
    let mock = Arc::new(MockBackend::new());
    let pipeline = shoot_pipeline(&mock);

    let err = pipeline.run_menu("", PhotoStyle::BrightModern).await.unwrap_err();
    assert_matches!(err, RunError::EmptyMenu);

    let err = pipeline
        .run_menu("   \n\t  ", PhotoStyle::BrightModern)
        .await
        .unwrap_err();
    assert_matches!(err, RunError::EmptyMenu);

    assert!(mock.calls().is_empty());
    assert!(pipeline.board().is_empty().await);
    assert!(!pipeline.is_running());
}

#[tokio::test(start_paused = true)]
async fn empty_menu_preserves_records_from_the_previous_run() {
    let mock = Arc::new(MockBackend::new());
    mock.push_text(Ok(menu_json(&["Soup"])));
    let pipeline = shoot_pipeline(&mock);

    pipeline
        .run_menu("Soup - $5", PhotoStyle::BrightModern)
        .await
        .expect("first run should succeed");
    assert_eq!(pipeline.board().len().await, 1);

    let err = pipeline.run_menu("", PhotoStyle::BrightModern).await.unwrap_err();
    assert_matches!(err, RunError::EmptyMenu);
    // Validation happens before the board is cleared.
    assert_eq!(pipeline.board().len().await, 1);
}

#[tokio::test(start_paused = true)]
async fn zero_parsed_dishes_aborts_with_one_error() {
    let mock = Arc::new(MockBackend::new());
    mock.push_text(Ok("[]".to_string()));
    let pipeline = shoot_pipeline(&mock);
    let mut rx = pipeline.subscribe();

    let err = pipeline
        .run_menu("opening hours: 9-5", PhotoStyle::BrightModern)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Could not parse any dishes from the menu. Please check the format."
    );
    assert_matches!(err, RunError::NoDishes);

    assert!(pipeline.board().is_empty().await);
    assert!(!pipeline.is_running());
    assert!(mock.image_call_instants().is_empty());

    // The run indicator is cleared via RunFinished even on abort.
    let events = drain_events(&mut rx);
    assert!(matches!(events.first(), Some(DishEvent::RunStarted)));
    assert!(matches!(events.last(), Some(DishEvent::RunFinished)));
}

#[tokio::test(start_paused = true)]
async fn parse_failure_aborts_with_the_collapsed_message() {
    let mock = Arc::new(MockBackend::new());
    mock.push_text(Err(GenAiError::Api {
        status: 503,
        status_code: Some("UNAVAILABLE".to_string()),
        message: "try again later".to_string(),
    }));
    let pipeline = shoot_pipeline(&mock);
    let mut rx = pipeline.subscribe();

    let err = pipeline
        .run_menu("Soup - $5", PhotoStyle::BrightModern)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to understand the menu. Please provide a clearer list of dishes."
    );

    assert!(pipeline.board().is_empty().await);
    assert!(!pipeline.is_running());
    let events = drain_events(&mut rx);
    assert!(matches!(events.last(), Some(DishEvent::RunFinished)));
}

#[tokio::test(start_paused = true)]
async fn rerunning_clears_all_previous_records_first() {
    let mock = Arc::new(MockBackend::new());
    mock.push_text(Ok(menu_json(&["Soup", "Salad"])));
    let pipeline = shoot_pipeline(&mock);

    pipeline
        .run_menu("menu one", PhotoStyle::BrightModern)
        .await
        .expect("first run should succeed");
    assert_eq!(pipeline.board().len().await, 2);

    mock.push_text(Ok(menu_json(&["Ramen"])));
    pipeline
        .run_menu("menu two", PhotoStyle::RusticDark)
        .await
        .expect("second run should succeed");

    let dishes = pipeline.board().snapshot().await;
    assert_eq!(dishes.len(), 1, "no accumulation across runs");
    assert_eq!(dishes[0].name, "Ramen");
}

// ---------------------------------------------------------------------------
// Progress events
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn a_full_run_emits_placeholder_and_outcome_events() {
    let mock = Arc::new(MockBackend::new());
    mock.push_text(Ok(menu_json(&["Soup", "Salad"])));
    mock.push_images(Err(GenAiError::Api {
        status: 500,
        status_code: None,
        message: "boom".to_string(),
    }));
    let pipeline = shoot_pipeline(&mock);
    let mut rx = pipeline.subscribe();

    pipeline
        .run_menu("menu", PhotoStyle::BrightModern)
        .await
        .expect("run should succeed");

    let events = drain_events(&mut rx);
    assert!(matches!(events.first(), Some(DishEvent::RunStarted)));
    assert!(matches!(events.last(), Some(DishEvent::RunFinished)));

    let queued = events
        .iter()
        .filter(|e| matches!(e, DishEvent::DishQueued { .. }))
        .count();
    let failed = events
        .iter()
        .filter(|e| matches!(e, DishEvent::DishFailed { .. }))
        .count();
    let completed = events
        .iter()
        .filter(|e| matches!(e, DishEvent::DishCompleted { .. }))
        .count();
    assert_eq!(queued, 2);
    assert_eq!(failed, 1);
    assert_eq!(completed, 1);
}
