use std::collections::HashMap;

use anyhow::{bail, Context, Result};

use squeal::backend::{Backend, BackendError, Cell, ColumnType, ResultColumn, ResultSet};
use squeal::{
    parse, CreateTableStatement, Error, Expression, InsertStatement, Location, SelectStatement,
    Statement, TokenKind,
};

fn init_tracing() {
    // Makes the advisory parse diagnostics visible under --nocapture.
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn literal_values(expressions: &[Expression]) -> Vec<(&str, TokenKind)> {
    expressions
        .iter()
        .map(|expression| {
            let Expression::Literal(token) = expression;
            (token.value.as_str(), token.kind)
        })
        .collect()
}

#[test]
fn select_from_quoted_table() -> Result<()> {
    init_tracing();
    let tree = parse(r#"SELECT id, name FROM "sketchy name""#)?;
    assert_eq!(tree.statements.len(), 1);

    let Statement::Select(select) = &tree.statements[0] else {
        bail!("expected a select statement");
    };

    assert_eq!(
        literal_values(&select.items),
        vec![("id", TokenKind::Identifier), ("name", TokenKind::Identifier)]
    );

    let Expression::Literal(id) = &select.items[0];
    assert_eq!(id.location, Location { line: 0, column: 7 });
    let Expression::Literal(name) = &select.items[1];
    assert_eq!(name.location, Location { line: 0, column: 11 });

    let from = select.from.as_ref().context("missing from table")?;
    assert_eq!(from.value, "sketchy name");
    assert_eq!(from.kind, TokenKind::Identifier);
    assert_eq!(from.location, Location { line: 0, column: 21 });

    Ok(())
}

#[test]
fn insert_positional_values() -> Result<()> {
    let tree = parse("INSERT INTO users VALUES (105, 'string')")?;
    assert_eq!(tree.statements.len(), 1);

    let Statement::Insert(insert) = &tree.statements[0] else {
        bail!("expected an insert statement");
    };

    assert_eq!(insert.table.value, "users");
    assert_eq!(
        literal_values(&insert.values),
        vec![("105", TokenKind::Numeric), ("string", TokenKind::String)]
    );

    Ok(())
}

#[test]
fn missing_comma_fails_at_second_literal() {
    init_tracing();
    let err = parse("SELECT 1 2;").unwrap_err();
    assert_eq!(
        err,
        Error::Parse {
            location: Location { line: 0, column: 9 },
            near: Some("2".into()),
        }
    );
}

#[test]
fn statement_auto_termination() -> Result<()> {
    assert_eq!(parse("SELECT 1")?, parse("SELECT 1;")?);
    Ok(())
}

#[test]
fn doubled_quote_escape_is_preserved_verbatim() -> Result<()> {
    let tree = parse("SELECT 'a '' b';")?;
    let Statement::Select(select) = &tree.statements[0] else {
        bail!("expected a select statement");
    };
    assert_eq!(literal_values(&select.items), vec![("a '' b", TokenKind::String)]);
    Ok(())
}

#[test]
fn identifier_case_folding() -> Result<()> {
    let tree = parse(r#"SELECT userName, "userName" FROM t;"#)?;
    let Statement::Select(select) = &tree.statements[0] else {
        bail!("expected a select statement");
    };
    assert_eq!(
        literal_values(&select.items),
        vec![
            ("username", TokenKind::Identifier),
            ("userName", TokenKind::Identifier),
        ]
    );
    Ok(())
}

#[test]
fn parse_is_idempotent() -> Result<()> {
    let source = "CREATE TABLE users (id int, name text);\n\
                  INSERT INTO users VALUES (1, 'Ada');\n\
                  SELECT id, name FROM users;";
    assert_eq!(parse(source)?, parse(source)?);
    Ok(())
}

#[test]
fn lex_failure_surfaces_through_parse() {
    let err = parse("SELECT @ FROM t;").unwrap_err();
    assert!(matches!(err, Error::Lex { .. }), "{err:?}");
}

#[test]
fn multiline_source_tracks_lines() -> Result<()> {
    let tree = parse("SELECT 1;\nSELECT 2;")?;
    let Statement::Select(second) = &tree.statements[1] else {
        bail!("expected a select statement");
    };
    let Expression::Literal(two) = &second.items[0];
    assert_eq!(two.location, Location { line: 1, column: 7 });
    Ok(())
}

/// Minimal in-memory stand-in for the storage engine, used to exercise the
/// capability contract: every statement variant maps to exactly one call.
#[derive(Default)]
struct MemoryBackend {
    tables: HashMap<String, Table>,
}

#[derive(Default)]
struct Table {
    columns: Vec<ResultColumn>,
    rows: Vec<Vec<Cell>>,
}

impl Backend for MemoryBackend {
    fn create_table(&mut self, statement: &CreateTableStatement) -> Result<(), BackendError> {
        let columns = statement
            .columns
            .iter()
            .map(|column| {
                let column_type = match column.datatype.value.as_str() {
                    "int" => ColumnType::Int,
                    "text" => ColumnType::Text,
                    _ => return Err(BackendError::InvalidDatatype),
                };
                Ok(ResultColumn {
                    name: column.name.value.clone(),
                    column_type,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.tables.insert(
            statement.table_name.value.clone(),
            Table {
                columns,
                rows: Vec::new(),
            },
        );
        Ok(())
    }

    fn insert(&mut self, statement: &InsertStatement) -> Result<(), BackendError> {
        let table = self
            .tables
            .get_mut(&statement.table.value)
            .ok_or(BackendError::TableDoesNotExist)?;

        if statement.values.len() != table.columns.len() {
            return Err(BackendError::MissingValues);
        }

        let row = statement
            .values
            .iter()
            .map(|value| {
                let Expression::Literal(token) = value;
                match token.kind {
                    TokenKind::Numeric => token
                        .value
                        .parse()
                        .map(Cell::Int)
                        .map_err(|_| BackendError::InvalidDatatype),
                    _ => Ok(Cell::Text(token.value.clone())),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        table.rows.push(row);
        Ok(())
    }

    fn select(&self, statement: &SelectStatement) -> Result<ResultSet, BackendError> {
        let from = statement
            .from
            .as_ref()
            .ok_or(BackendError::TableDoesNotExist)?;
        let table = self
            .tables
            .get(&from.value)
            .ok_or(BackendError::TableDoesNotExist)?;

        let mut indexes = Vec::new();
        for item in &statement.items {
            let Expression::Literal(token) = item;
            if token.kind != TokenKind::Identifier {
                return Err(BackendError::InvalidSelectItem);
            }
            let index = table
                .columns
                .iter()
                .position(|column| column.name == token.value)
                .ok_or(BackendError::ColumnDoesNotExist)?;
            indexes.push(index);
        }

        Ok(ResultSet {
            columns: indexes
                .iter()
                .map(|&index| table.columns[index].clone())
                .collect(),
            rows: table
                .rows
                .iter()
                .map(|row| indexes.iter().map(|&index| row[index].clone()).collect())
                .collect(),
        })
    }
}

fn dispatch(
    backend: &mut MemoryBackend,
    statement: &Statement,
) -> Result<Option<ResultSet>, BackendError> {
    match statement {
        Statement::Select(select) => backend.select(select).map(Some),
        Statement::Insert(insert) => backend.insert(insert).map(|_| None),
        Statement::CreateTable(create) => backend.create_table(create).map(|_| None),
    }
}

#[test]
fn tree_drives_the_backend_contract() -> Result<()> {
    init_tracing();
    let tree = parse(
        "CREATE TABLE users (id int, name text);\n\
         INSERT INTO users VALUES (105, 'Phil');\n\
         SELECT name, id FROM users;",
    )?;

    let mut backend = MemoryBackend::default();
    let mut last = None;
    for statement in &tree.statements {
        last = dispatch(&mut backend, statement)?;
    }

    let result = last.context("select produced no result set")?;
    assert_eq!(
        result.columns,
        vec![
            ResultColumn {
                name: "name".into(),
                column_type: ColumnType::Text
            },
            ResultColumn {
                name: "id".into(),
                column_type: ColumnType::Int
            },
        ]
    );
    assert_eq!(
        result.rows,
        vec![vec![Cell::Text("Phil".into()), Cell::Int(105)]]
    );
    assert_eq!(result.rows[0][1].as_int(), Some(105));
    assert_eq!(result.rows[0][0].as_text(), "Phil");

    Ok(())
}

#[test]
fn unknown_table_is_a_backend_error() -> Result<()> {
    let tree = parse("SELECT id FROM missing;")?;
    let mut backend = MemoryBackend::default();
    let err = dispatch(&mut backend, &tree.statements[0]).unwrap_err();
    assert_eq!(err, BackendError::TableDoesNotExist);
    Ok(())
}
