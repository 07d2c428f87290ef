use thiserror::Error;

#[derive(Error, Debug)]
pub enum SQLError {
    #[error("query error: {0}")]
    Query(String),

    #[error("execution error: {0}")]
    Execution(String),

    #[error("connection error: {0}")]
    Connection(String),

    /// A UNIQUE/PRIMARY KEY constraint rejected the statement. Surfaced
    /// separately so callers can map duplicates to a domain conflict
    /// instead of a generic storage failure.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// A `require_affected` statement inside `exec_tx` matched no rows;
    /// the whole transaction was rolled back.
    #[error("transaction aborted: statement {index} affected no rows")]
    Aborted { index: usize },
}
