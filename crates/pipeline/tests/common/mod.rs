//! Shared helpers for pipeline integration tests.

use std::sync::Arc;

use menushot_genai::backend::GenAiBackend;
use menushot_genai::mock::MockBackend;
use menushot_pipeline::driver::PhotoPipeline;

/// Encode a list of dish names as the JSON array the parser expects.
pub fn menu_json(names: &[&str]) -> String {
    serde_json::to_string(names).expect("dish names serialize")
}

/// Build a pipeline over a scripted mock backend with the default
/// configuration (10 s inter-request delay).
pub fn shoot_pipeline(mock: &Arc<MockBackend>) -> PhotoPipeline {
    PhotoPipeline::new(Arc::clone(mock) as Arc<dyn GenAiBackend>)
}
