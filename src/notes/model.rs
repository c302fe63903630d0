use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub note: Option<String>,
    pub category: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub completed: Option<bool>,
}

/// Create body. Nothing is validated beyond being JSON; an absent
/// field is inserted as NULL.
#[derive(Debug, Deserialize)]
pub struct CreateNote {
    pub note: Option<String>,
    pub completed: Option<bool>,
}

/// Update body. Both columns are written back verbatim, absent fields
/// included.
#[derive(Debug, Deserialize)]
pub struct UpdateNote {
    pub note: Option<String>,
    pub completed: Option<bool>,
}

/// The `{status, data: {notes}}` envelope used by the read and create
/// responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct NotesResponse {
    pub status: String,
    pub data: NotesData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotesData {
    pub notes: Vec<Note>,
}

impl NotesResponse {
    pub fn success(notes: Vec<Note>) -> Self {
        Self {
            status: "success".into(),
            data: NotesData { notes },
        }
    }
}

/// Statement outcome as existing clients expect to see it: the rows a
/// statement returned plus how many there were. Serves as the delete
/// response body and as the 404 body everywhere.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub command: String,
    pub row_count: usize,
    pub rows: Vec<Note>,
}

impl QueryResult {
    pub fn new(command: impl Into<String>, rows: Vec<Note>) -> Self {
        Self {
            command: command.into(),
            row_count: rows.len(),
            rows,
        }
    }
}
