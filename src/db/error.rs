use sqlx::error::DatabaseError as SqlxDatabaseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Record not found")]
    NotFound,

    #[error("Overlapping appointment for this professional")]
    Conflict,
}

impl DatabaseError {
    /// Maps the Postgres exclusion-constraint violation raised by the
    /// appointments overlap backstop onto the domain conflict.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if SqlxDatabaseError::constraint(db_err.as_ref()) == Some("appointments_no_overlap") {
                return DatabaseError::Conflict;
            }
        }
        DatabaseError::Sqlx(err)
    }
}
