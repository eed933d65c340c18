//! Row parsing and query-building helpers shared by the repos.

use evx_core::enums::EntityType;

use crate::error::DatabaseError;

/// Ids bound per `IN (...)` query. Candidate sets can hold tens of
/// thousands of ids; `SQLite` caps bound parameters per statement.
pub const ID_CHUNK_SIZE: usize = 500;

/// `?1, ?2, ..., ?n` for an `IN` clause.
#[must_use]
pub fn placeholders(n: usize) -> String {
    (1..=n)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Sorted, owned copy of an id set so chunked queries are deterministic.
#[must_use]
pub fn sorted_ids<'a, I>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut out: Vec<String> = ids.into_iter().cloned().collect();
    out.sort_unstable();
    out.dedup();
    out
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
/// You must use `get::<Option<String>>()` for nullable columns.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Parse the `item_type` column.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` for anything but `drug` / `target`.
pub fn parse_entity_type(s: &str) -> Result<EntityType, DatabaseError> {
    s.parse::<EntityType>()
        .map_err(|e| DatabaseError::InvalidState(format!("item_type column: {e}")))
}

/// Convert a SQL `COUNT(...)` into `u64`.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` on a negative count.
pub fn count_to_u64(count: i64) -> Result<u64, DatabaseError> {
    u64::try_from(count)
        .map_err(|_| DatabaseError::InvalidState(format!("negative counter {count}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_numbered() {
        assert_eq!(placeholders(3), "?1, ?2, ?3");
        assert_eq!(placeholders(0), "");
    }

    #[test]
    fn sorted_ids_dedups() {
        let ids = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(sorted_ids(&ids), vec!["a", "b"]);
    }

    #[test]
    fn entity_type_column_parses() {
        assert_eq!(parse_entity_type("drug").unwrap(), EntityType::Drug);
        assert!(matches!(
            parse_entity_type("gene"),
            Err(DatabaseError::InvalidState(_))
        ));
    }

    #[test]
    fn negative_counts_are_rejected() {
        assert_eq!(count_to_u64(7).unwrap(), 7);
        assert!(count_to_u64(-1).is_err());
    }
}
