/// Dish records are process-unique and never persisted, so ids are UUIDv4.
pub type DishId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
