use crate::db::DB;

/// Every request sees the same connection; clones share the one
/// writer thread underneath.
#[derive(Clone)]
pub struct AppState {
    pub conn: DB,
}
