//! Shared state container for the dish list.
//!
//! [`DishBoard`] owns the in-memory collection of [`Dish`] records behind a
//! [`tokio::sync::RwLock`]. It is designed to be shared via `Arc<DishBoard>`
//! between the pipeline driver, spawned generation tasks, and whatever
//! surface renders the records. Every mutation is a single-record
//! lookup-and-replace keyed by id; sibling records are never touched.

use tokio::sync::RwLock;

use crate::dish::Dish;
use crate::types::DishId;

/// Lock-protected, append-ordered collection of dish records.
#[derive(Debug, Default)]
pub struct DishBoard {
    dishes: RwLock<Vec<Dish>>,
}

impl DishBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every record. Called at the start of each run so results never
    /// accumulate across runs.
    pub async fn reset(&self) {
        self.dishes.write().await.clear();
    }

    /// Append a new record, preserving parse order.
    pub async fn push(&self, dish: Dish) {
        self.dishes.write().await.push(dish);
    }

    /// Apply `f` to the record with the given id, leaving all other records
    /// untouched. Returns `false` when no such record exists.
    pub async fn update<F>(&self, id: DishId, f: F) -> bool
    where
        F: FnOnce(&mut Dish),
    {
        let mut dishes = self.dishes.write().await;
        match dishes.iter_mut().find(|d| d.id == id) {
            Some(dish) => {
                f(dish);
                true
            }
            None => false,
        }
    }

    /// Clone of the record with the given id, if present.
    pub async fn get(&self, id: DishId) -> Option<Dish> {
        self.dishes.read().await.iter().find(|d| d.id == id).cloned()
    }

    /// Clone of the full record list in insertion order.
    pub async fn snapshot(&self) -> Vec<Dish> {
        self.dishes.read().await.clone()
    }

    /// Number of records currently on the board.
    pub async fn len(&self) -> usize {
        self.dishes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.dishes.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn push_preserves_insertion_order() {
        let board = DishBoard::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        board.push(Dish::placeholder(a, "Soup")).await;
        board.push(Dish::placeholder(b, "Salad")).await;

        let all = board.snapshot().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, a);
        assert_eq!(all[1].id, b);
    }

    #[tokio::test]
    async fn update_touches_only_the_target_record() {
        let board = DishBoard::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        board.push(Dish::placeholder(a, "Soup")).await;
        board.push(Dish::placeholder(b, "Salad")).await;

        let updated = board
            .update(a, |d| d.fail_generation("backend unavailable"))
            .await;
        assert!(updated);

        let soup = board.get(a).await.expect("soup should exist");
        let salad = board.get(b).await.expect("salad should exist");
        assert_eq!(soup.error.as_deref(), Some("backend unavailable"));
        assert!(salad.error.is_none());
        assert!(salad.is_generating);
    }

    #[tokio::test]
    async fn update_missing_record_returns_false() {
        let board = DishBoard::new();
        let touched = board.update(Uuid::new_v4(), |d| d.begin_edit()).await;
        assert!(!touched);
    }

    #[tokio::test]
    async fn reset_clears_all_records() {
        let board = DishBoard::new();
        board.push(Dish::placeholder(Uuid::new_v4(), "Soup")).await;
        board.push(Dish::placeholder(Uuid::new_v4(), "Salad")).await;
        board.reset().await;
        assert!(board.is_empty().await);
    }
}
