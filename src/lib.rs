//! Front end of a toy SQL engine: tokenizes and parses `SELECT`,
//! `INSERT INTO ... VALUES`, and `CREATE TABLE` statements into a typed
//! syntax tree. Execution and storage live behind the [`backend::Backend`]
//! contract and are not implemented here.

pub mod backend;
pub mod error;
pub mod sql;

pub use error::Error;
pub use sql::ast::{
    ColumnMeta, CreateTableStatement, Expression, InsertStatement, SelectStatement, Statement,
    SyntaxTree,
};
pub use sql::parser::parse;
pub use sql::token::{Location, Token, TokenKind};
