//! Classification of PostgreSQL driver errors.

/// Name of the unique constraint on `url_maps.token`.
pub const TOKEN_UNIQUE_CONSTRAINT: &str = "url_maps_token_key";

/// Returns true if `e` is a unique violation on the token column.
pub fn is_unique_violation_on_token(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(TOKEN_UNIQUE_CONSTRAINT))
}

/// Returns true if `e` is a foreign key violation, e.g. a visit for a missing mapping.
pub fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_violations() {
        let err = sqlx::Error::RowNotFound;
        assert!(!is_unique_violation_on_token(&err));
        assert!(!is_foreign_key_violation(&err));
    }
}
