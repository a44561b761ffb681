//! Progress events emitted by the pipeline.
//!
//! Broadcast so that any number of observers (a CLI, tests, a future UI
//! bridge) can render progressive feedback while a run is underway.
//! Publishing with zero subscribers is a silent no-op.

use menushot_core::types::DishId;
use serde::Serialize;

/// Broadcast channel capacity for pipeline events.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A state change in a photo-shoot run or an edit.
#[derive(Debug, Clone, Serialize)]
pub enum DishEvent {
    /// A run passed input validation and is underway.
    RunStarted,

    /// A placeholder record was published for a parsed dish.
    DishQueued { dish_id: DishId, name: String },

    /// A dish's photo was generated and stored on its record.
    DishCompleted { dish_id: DishId },

    /// A dish's generation failed; the classified message is on its record.
    DishFailed { dish_id: DishId, error: String },

    /// An edit was applied to a dish's photo.
    DishEdited { dish_id: DishId },

    /// An edit failed; the generic message is on the record.
    DishEditFailed { dish_id: DishId },

    /// The run finished: success, partial success, or total failure.
    RunFinished,
}
