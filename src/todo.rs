//! Todo model
//!
//! The single persisted entity and the request body used to create or
//! replace one.

use serde::{Deserialize, Deserializer, Serialize};

/// Todo identifier, assigned by the store on creation
pub type TodoId = i64;

/// A persisted todo item
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
}

/// Body of POST /todos and PUT /todos/{id}
///
/// Missing and `null` fields decode to their zero values and any `id` sent
/// by the client is ignored.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TodoInput {
    #[serde(default, alias = "task", deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl TodoInput {
    pub fn new(text: impl Into<String>, completed: bool) -> Self {
        Self {
            text: text.into(),
            completed,
        }
    }
}
