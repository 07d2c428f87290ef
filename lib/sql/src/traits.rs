use crate::error::SQLError;

/// A dynamically-typed SQL parameter value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

/// A row returned from a SQL query — column name to value.
#[derive(Debug, Clone)]
pub struct Row {
    pub columns: Vec<(String, Value)>,
}

impl Row {
    /// Get a column value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Get a text column value by name.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Value::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get an integer column value by name.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(Value::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    /// Get a real column value by name.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(Value::Real(f)) => Some(*f),
            _ => None,
        }
    }
}

/// One statement inside an atomic [`SQLStore::exec_tx`] batch.
#[derive(Debug, Clone)]
pub struct TxStmt {
    pub sql: String,
    pub params: Vec<Value>,
    /// Roll the whole batch back if this statement affects no rows.
    /// This is the compare-and-swap guard: "delete the like record, and
    /// abort everything if it wasn't there".
    pub require_affected: bool,
}

impl TxStmt {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
            require_affected: false,
        }
    }

    /// Mark this statement as mandatory: zero affected rows aborts the
    /// transaction with [`SQLError::Aborted`].
    pub fn required(mut self) -> Self {
        self.require_affected = true;
        self
    }
}

/// SQLStore provides a SQL execution interface backed by an embedded database.
pub trait SQLStore: Send + Sync {
    /// Execute a query and return rows.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError>;

    /// Execute a statement (INSERT/UPDATE/DELETE) and return affected row count.
    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError>;

    /// Execute a batch of statements in a single transaction.
    ///
    /// All-or-nothing: any statement error rolls everything back, as does
    /// a `require_affected` statement that matches no rows (surfaced as
    /// [`SQLError::Aborted`] with the statement index). On success the
    /// affected row count of every statement is returned in order.
    fn exec_tx(&self, stmts: &[TxStmt]) -> Result<Vec<u64>, SQLError>;
}
