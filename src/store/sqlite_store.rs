//! SQLite implementation of TodoStore

use std::sync::{Mutex, MutexGuard};

use log::{debug, info, warn};
use rusqlite::{params, Connection};

use crate::error::TodoError;
use crate::store::TodoStore;
use crate::todo::{Todo, TodoId};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        text TEXT NOT NULL,
        completed BOOLEAN NOT NULL
    )";

/// SQLite implementation of TodoStore
///
/// One connection shared by all workers; rusqlite connections are not
/// `Sync`, so access goes through a mutex.
pub struct SqliteTodoStore {
    conn: Mutex<Connection>,
}

impl SqliteTodoStore {
    /// Open the database named by `connection_string` and make sure the
    /// `todos` table exists.
    ///
    /// Accepts a file path, `:memory:` or a SQLite `file:` URI.
    pub fn open(connection_string: &str, wal_mode: bool) -> Result<Self, TodoError> {
        info!("Opening SQLite database: {}", connection_string);
        let conn = Connection::open(connection_string)?;

        if wal_mode && !is_in_memory(connection_string) {
            let mode: String = conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
            if !mode.eq_ignore_ascii_case("wal") {
                warn!("WAL journal mode requested but database reports '{}'", mode);
            }
        }

        Self::from_connection(conn)
    }

    /// Private in-memory database, mostly for tests
    pub fn open_in_memory() -> Result<Self, TodoError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, TodoError> {
        conn.execute(CREATE_TABLE, [])?;
        debug!("todos table ready");
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, TodoError> {
        self.conn.lock().map_err(|_| TodoError::LockPoisoned)
    }
}

fn is_in_memory(connection_string: &str) -> bool {
    connection_string == ":memory:" || connection_string.contains("mode=memory")
}

impl TodoStore for SqliteTodoStore {
    fn list(&self) -> Result<Vec<Todo>, TodoError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, text, completed FROM todos ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Todo {
                id: row.get(0)?,
                text: row.get(1)?,
                completed: row.get(2)?,
            })
        })?;

        let mut todos = Vec::new();
        for row in rows {
            todos.push(row?);
        }
        Ok(todos)
    }

    fn create(&self, text: &str, completed: bool) -> Result<Todo, TodoError> {
        let conn = self.conn()?;
        let id: TodoId = conn.query_row(
            "INSERT INTO todos (text, completed) VALUES (?1, ?2) RETURNING id",
            params![text, completed],
            |row| row.get(0),
        )?;
        debug!("Inserted todo {}", id);
        Ok(Todo {
            id,
            text: text.to_string(),
            completed,
        })
    }

    fn update(&self, id: TodoId, text: &str, completed: bool) -> Result<(), TodoError> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE todos SET text = ?1, completed = ?2 WHERE id = ?3",
            params![text, completed, id],
        )?;
        debug!("Updated todo {} ({} row(s))", id, changed);
        Ok(())
    }

    fn delete(&self, id: TodoId) -> Result<(), TodoError> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM todos WHERE id = ?1", params![id])?;
        debug!("Deleted todo {} ({} row(s))", id, changed);
        Ok(())
    }
}
