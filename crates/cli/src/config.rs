use std::path::PathBuf;
use std::time::Duration;

use menushot_core::style::PhotoStyle;
use menushot_pipeline::driver::DEFAULT_INTER_REQUEST_DELAY;

/// CLI configuration loaded from environment variables.
///
/// The API key is the single process-scoped credential; it is read once
/// at startup and never refreshed.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Gemini API key (required).
    pub api_key: String,
    /// Override for the backend base URL, if set.
    pub base_url: Option<String>,
    /// Photo style applied to the whole run.
    pub style: PhotoStyle,
    /// Directory the generated photos are written into.
    pub output_dir: PathBuf,
    /// Spacing between generation requests.
    pub inter_request_delay: Duration,
    /// Optional edit instruction applied to every generated photo.
    pub edit_instruction: Option<String>,
}

impl CliConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default              |
    /// |-----------------------|----------------------|
    /// | `GEMINI_API_KEY`      | (required)           |
    /// | `GEMINI_BASE_URL`     | production endpoint  |
    /// | `MENUSHOT_STYLE`      | `Bright/Modern`      |
    /// | `MENUSHOT_OUTPUT_DIR` | `photos`             |
    /// | `MENUSHOT_DELAY_SECS` | `10`                 |
    /// | `MENUSHOT_EDIT`       | (none)               |
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set");

        let base_url = std::env::var("GEMINI_BASE_URL").ok();

        let style = match std::env::var("MENUSHOT_STYLE") {
            Ok(label) => PhotoStyle::parse(&label).expect("MENUSHOT_STYLE must be a valid style"),
            Err(_) => PhotoStyle::BrightModern,
        };

        let output_dir = PathBuf::from(
            std::env::var("MENUSHOT_OUTPUT_DIR").unwrap_or_else(|_| "photos".into()),
        );

        let inter_request_delay = match std::env::var("MENUSHOT_DELAY_SECS") {
            Ok(secs) => Duration::from_secs(
                secs.parse().expect("MENUSHOT_DELAY_SECS must be a valid u64"),
            ),
            Err(_) => DEFAULT_INTER_REQUEST_DELAY,
        };

        let edit_instruction = std::env::var("MENUSHOT_EDIT").ok().filter(|s| !s.is_empty());

        Self {
            api_key,
            base_url,
            style,
            output_dir,
            inter_request_delay,
            edit_instruction,
        }
    }
}
