use rusqlite::{params, Row};

use crate::{db, db::DB, Error, Result};

use super::{CreateNote, Note, NotesResponse, QueryResult, UpdateNote};

impl<'a> TryFrom<&Row<'a>> for Note {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            note: row.get(1)?,
            category: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
            completed: row.get(5)?,
        })
    }
}

pub async fn find_notes(db: DB) -> Result<NotesResponse> {
    let notes = db
        .call(move |conn| {
            let notes = conn
                .prepare("SELECT id, note, category, created_at, updated_at, completed FROM notes")?
                .query_map([], |row| Note::try_from(row))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(notes)
        })
        .await
        .map_err(db::Error::from)?;

    Ok(NotesResponse::success(notes))
}

pub async fn create_note(CreateNote { note, completed }: CreateNote, db: DB) -> Result<NotesResponse> {
    let rows = db
        .call(move |conn| {
            let rows = conn
                .prepare(
                    r#"INSERT INTO notes (note, category, created_at, updated_at, completed)
                    VALUES (?, 'General', datetime('now'), datetime('now'), ?)
                    RETURNING id, note, category, created_at, updated_at, completed"#,
                )?
                .query_map(params![note, completed], |row| Note::try_from(row))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(db::Error::from)?;

    if rows.len() == 1 {
        Ok(NotesResponse::success(rows))
    } else {
        Err(Error::RowCount(QueryResult::new("INSERT", rows)))
    }
}

/// The id arrives as raw path text and is bound as-is: the column's
/// INTEGER affinity converts numeric strings for the comparison, and
/// anything else matches no rows.
pub async fn get_note(id: String, db: DB) -> Result<NotesResponse> {
    let rows = db
        .call(move |conn| {
            let rows = conn
                .prepare("SELECT id, note, category, created_at, updated_at, completed FROM notes WHERE id = ?")?
                .query_map(params![id], |row| Note::try_from(row))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(db::Error::from)?;

    if rows.len() == 1 {
        Ok(NotesResponse::success(rows))
    } else {
        Err(Error::NotFound(QueryResult::new("SELECT", rows)))
    }
}

/// Overwrites `note` and `completed` with whatever the body carried,
/// absent fields included, and leaves `updated_at` at its insert-time
/// value. Existing clients depend on both behaviors.
pub async fn update_note(id: String, UpdateNote { note, completed }: UpdateNote, db: DB) -> Result<Note> {
    let mut rows = db
        .call(move |conn| {
            let rows = conn
                .prepare(
                    r#"UPDATE notes SET note = ?, completed = ?
                    WHERE id = ?
                    RETURNING id, note, category, created_at, updated_at, completed"#,
                )?
                .query_map(params![note, completed, id], |row| Note::try_from(row))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(db::Error::from)?;

    if rows.len() == 1 {
        Ok(rows.remove(0))
    } else {
        Err(Error::NotFound(QueryResult::new("UPDATE", rows)))
    }
}

pub async fn delete_note(id: String, db: DB) -> Result<QueryResult> {
    let rows = db
        .call(move |conn| {
            let rows = conn
                .prepare(
                    r#"DELETE FROM notes
                    WHERE id = ?
                    RETURNING id, note, category, created_at, updated_at, completed"#,
                )?
                .query_map(params![id], |row| Note::try_from(row))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(db::Error::from)?;

    let result = QueryResult::new("DELETE", rows);
    if result.row_count == 1 {
        Ok(result)
    } else {
        Err(Error::NotFound(result))
    }
}
