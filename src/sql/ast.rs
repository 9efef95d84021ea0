use super::token::Token;

/// Ordered sequence of parsed statements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntaxTree {
    pub statements: Vec<Statement>,
}

/// One parsed statement. The variant is the single source of truth for the
/// statement kind; there is no way to observe the fields of a non-active
/// variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Select(SelectStatement),
    Insert(InsertStatement),
    CreateTable(CreateTableStatement),
}

/// `SELECT <items> [FROM <table>]`. `from` is absent for a bare
/// `SELECT <literals>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    pub items: Vec<Expression>,
    pub from: Option<Token>,
}

/// `INSERT INTO <table> VALUES (<values>)`. Values are positional; there is
/// no column-list form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    pub table: Token,
    pub values: Vec<Expression>,
}

/// `CREATE TABLE <name> (<column definitions>)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTableStatement {
    pub table_name: Token,
    pub columns: Vec<ColumnMeta>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: Token,
    pub datatype: Token,
}

/// Expressions are literal tokens for now; the enum leaves room for
/// non-literal forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Literal(Token),
}
