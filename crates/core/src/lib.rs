//! Domain types for the menu photo-shoot pipeline.
//!
//! Holds the [`Dish`](dish::Dish) record, the [`DishBoard`](board::DishBoard)
//! state container, the closed [`PhotoStyle`](style::PhotoStyle)
//! configuration, and the data-URL helpers shared by the pipeline and the
//! CLI. No I/O happens in this crate.

pub mod board;
pub mod data_url;
pub mod dish;
pub mod style;
pub mod types;
