//! Todo Storage Layer Abstraction
//!
//! Data access for the `todos` table. Every operation maps onto exactly one
//! parameterized statement; there are no transactions, batching or retries.
//! Backends are interchangeable behind the `TodoStore` trait so the HTTP
//! layer never knows which one it talks to.

pub mod config;
pub mod mock_store;
pub mod sqlite_store;


use crate::error::TodoError;
use crate::todo::{Todo, TodoId};

/// Trait defining the todo storage interface
pub trait TodoStore: Send + Sync {
    /// All todos ordered by id
    fn list(&self) -> Result<Vec<Todo>, TodoError>;

    /// Insert a todo and return it with its assigned id
    fn create(&self, text: &str, completed: bool) -> Result<Todo, TodoError>;

    /// Overwrite text and completion flag. Missing ids are not an error.
    fn update(&self, id: TodoId, text: &str, completed: bool) -> Result<(), TodoError>;

    /// Remove a todo. Missing ids are not an error.
    fn delete(&self, id: TodoId) -> Result<(), TodoError>;
}
