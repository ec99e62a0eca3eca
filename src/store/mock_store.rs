//! Mock implementation of TodoStore for testing

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::TodoError;
use crate::store::TodoStore;
use crate::todo::{Todo, TodoId};

#[derive(Default)]
struct Inner {
    todos: BTreeMap<TodoId, Todo>,
    last_id: TodoId,
}

/// In-memory TodoStore with the same semantics as the SQLite table:
/// ids start at 1, only grow, and are never reused.
#[derive(Default)]
pub struct MockTodoStore {
    inner: Mutex<Inner>,
}

impl MockTodoStore {
    /// Create a new mock todo store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored todos
    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.todos.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn inner(&self) -> Result<MutexGuard<'_, Inner>, TodoError> {
        self.inner.lock().map_err(|_| TodoError::LockPoisoned)
    }
}

impl TodoStore for MockTodoStore {
    fn list(&self) -> Result<Vec<Todo>, TodoError> {
        Ok(self.inner()?.todos.values().cloned().collect())
    }

    fn create(&self, text: &str, completed: bool) -> Result<Todo, TodoError> {
        let mut inner = self.inner()?;
        inner.last_id += 1;
        let todo = Todo {
            id: inner.last_id,
            text: text.to_string(),
            completed,
        };
        inner.todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    fn update(&self, id: TodoId, text: &str, completed: bool) -> Result<(), TodoError> {
        if let Some(todo) = self.inner()?.todos.get_mut(&id) {
            todo.text = text.to_string();
            todo.completed = completed;
        }
        Ok(())
    }

    fn delete(&self, id: TodoId) -> Result<(), TodoError> {
        self.inner()?.todos.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_store_basic_operations() {
        let store = MockTodoStore::new();
        assert!(store.is_empty());

        let todo = store.create("write tests", false).unwrap();
        assert_eq!(todo.id, 1);
        assert_eq!(store.len(), 1);

        store.update(todo.id, "write more tests", true).unwrap();
        let listed = store.list().unwrap();
        assert_eq!(listed[0].text, "write more tests");
        assert!(listed[0].completed);

        store.delete(todo.id).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_mock_store_never_reuses_ids() {
        let store = MockTodoStore::new();
        let first = store.create("a", false).unwrap();
        store.delete(first.id).unwrap();
        assert_eq!(store.create("b", false).unwrap().id, 2);
    }
}
