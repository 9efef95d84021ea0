//! Capability contract between the parsed syntax tree and a storage/execution
//! engine. Each statement variant maps 1:1 to one call. No implementation
//! lives in this crate; the evaluator is an external collaborator.

use thiserror::Error;

use crate::sql::ast::{CreateTableStatement, InsertStatement, SelectStatement};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("Table does not exist")]
    TableDoesNotExist,
    #[error("Column does not exist")]
    ColumnDoesNotExist,
    #[error("Select item is not valid")]
    InvalidSelectItem,
    #[error("Invalid datatype")]
    InvalidDatatype,
    #[error("Missing values")]
    MissingValues,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Text,
}

/// One value in a result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Int(i64),
    Text(String),
}

impl Cell {
    pub fn as_text(&self) -> String {
        match self {
            Cell::Int(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Cell::Int(n) => Some(*n),
            Cell::Text(s) => s.parse().ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultColumn {
    pub name: String,
    pub column_type: ColumnType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    pub columns: Vec<ResultColumn>,
    pub rows: Vec<Vec<Cell>>,
}

pub trait Backend {
    fn create_table(&mut self, statement: &CreateTableStatement) -> Result<(), BackendError>;
    fn insert(&mut self, statement: &InsertStatement) -> Result<(), BackendError>;
    fn select(&self, statement: &SelectStatement) -> Result<ResultSet, BackendError>;
}
