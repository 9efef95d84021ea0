use tracing::debug;

use super::ast::{
    ColumnMeta, CreateTableStatement, Expression, InsertStatement, SelectStatement, Statement,
    SyntaxTree,
};
use super::keywords;
use super::scanner;
use super::token::{Location, Token, TokenKind};
use crate::error::Error;

/// Statement parsers report failure as the index of the token they could not
/// accept, so dispatch can surface the furthest point reached across all
/// attempted grammars.
type ParseResult<T> = Result<(T, usize), usize>;

/// Parses a source string into a syntax tree.
///
/// The source is tokenized up front; if the stream is non-empty and does not
/// end with a semicolon, a synthetic one is appended so a final statement
/// without a trailing `;` still parses. Statements are then parsed one after
/// another, each followed by a drain to (and past) its closing semicolon.
/// Tokens between the end of a statement and the semicolon are skipped
/// without validation.
pub fn parse(source: &str) -> Result<SyntaxTree, Error> {
    let mut tokens = scanner::tokenize(source)?;

    let semicolon = symbol_token(keywords::SEMICOLON);
    if tokens.last().is_some_and(|last| *last != semicolon) {
        tokens.push(semicolon.clone());
    }

    let mut tree = SyntaxTree::default();
    let mut cursor = 0;

    while cursor < tokens.len() {
        match parse_statement(&tokens, cursor) {
            Ok((statement, next)) => {
                cursor = next;
                tree.statements.push(statement);
            }
            Err(at) => {
                report(&tokens, at, "Expected statement");
                return Err(parse_failure(&tokens, at));
            }
        }

        let mut terminated = false;
        while cursor < tokens.len() {
            let found = tokens[cursor] == semicolon;
            cursor += 1;
            if found {
                terminated = true;
                break;
            }
        }
        if !terminated {
            report(&tokens, cursor, "Expected semi-colon delimiter between statements");
            return Err(parse_failure(&tokens, cursor));
        }
    }

    Ok(tree)
}

/// Tries the statement parsers in fixed order; the first success wins. Each
/// parser returns an advanced cursor only on success, so a failed attempt
/// leaves the dispatch cursor untouched for the next one. When every grammar
/// fails, the failure that got furthest identifies the offending token.
fn parse_statement(tokens: &[Token], cursor: usize) -> ParseResult<Statement> {
    let select = match parse_select(tokens, cursor) {
        Ok((select, next)) => return Ok((Statement::Select(select), next)),
        Err(at) => at,
    };
    let insert = match parse_insert(tokens, cursor) {
        Ok((insert, next)) => return Ok((Statement::Insert(insert), next)),
        Err(at) => at,
    };
    let create = match parse_create_table(tokens, cursor) {
        Ok((create, next)) => return Ok((Statement::CreateTable(create), next)),
        Err(at) => at,
    };
    Err(select.max(insert).max(create))
}

/// `SELECT` expressions [`FROM` identifier]. The expression list runs until
/// `FROM` or the statement delimiter.
fn parse_select(tokens: &[Token], cursor: usize) -> ParseResult<SelectStatement> {
    let mut cursor = parse_token(tokens, cursor, &reserved_token(keywords::SELECT)).ok_or(cursor)?;

    let from = reserved_token(keywords::FROM);
    let (items, next) = parse_expressions(
        tokens,
        cursor,
        &[from.clone(), symbol_token(keywords::SEMICOLON)],
    )?;
    cursor = next;

    let mut statement = SelectStatement { items, from: None };

    if let Some(after_from) = parse_token(tokens, cursor, &from) {
        let (table, next) =
            expect_kind(tokens, after_from, TokenKind::Identifier, "Expected table name")?;
        statement.from = Some(table.clone());
        cursor = next;
    }

    Ok((statement, cursor))
}

/// `INSERT INTO` identifier `VALUES` `(` expressions `)`.
fn parse_insert(tokens: &[Token], cursor: usize) -> ParseResult<InsertStatement> {
    let cursor = parse_token(tokens, cursor, &reserved_token(keywords::INSERT)).ok_or(cursor)?;
    let cursor = parse_token(tokens, cursor, &reserved_token(keywords::INTO)).ok_or(cursor)?;

    let (table, cursor) =
        expect_kind(tokens, cursor, TokenKind::Identifier, "Expected table name")?;

    let cursor = expect_token(
        tokens,
        cursor,
        &reserved_token(keywords::VALUES),
        "Expected VALUES keyword",
    )?;
    let cursor = expect_token(
        tokens,
        cursor,
        &symbol_token(keywords::LEFT_PAREN),
        "Expected opening parenthesis before values",
    )?;

    let (values, cursor) =
        parse_expressions(tokens, cursor, &[symbol_token(keywords::RIGHT_PAREN)])?;

    let cursor = expect_token(
        tokens,
        cursor,
        &symbol_token(keywords::RIGHT_PAREN),
        "Expected closing parenthesis after values",
    )?;

    Ok((
        InsertStatement {
            table: table.clone(),
            values,
        },
        cursor,
    ))
}

/// `CREATE TABLE` identifier `(` column definitions `)`.
fn parse_create_table(tokens: &[Token], cursor: usize) -> ParseResult<CreateTableStatement> {
    let cursor = parse_token(tokens, cursor, &reserved_token(keywords::CREATE)).ok_or(cursor)?;
    let cursor = parse_token(tokens, cursor, &reserved_token(keywords::TABLE)).ok_or(cursor)?;

    let (table_name, cursor) =
        expect_kind(tokens, cursor, TokenKind::Identifier, "Expected table name")?;

    let cursor = expect_token(
        tokens,
        cursor,
        &symbol_token(keywords::LEFT_PAREN),
        "Expected opening parenthesis before column definitions",
    )?;

    let (columns, cursor) =
        parse_column_defs(tokens, cursor, &symbol_token(keywords::RIGHT_PAREN))?;

    let cursor = expect_token(
        tokens,
        cursor,
        &symbol_token(keywords::RIGHT_PAREN),
        "Expected closing parenthesis after column definitions",
    )?;

    Ok((
        CreateTableStatement {
            table_name: table_name.clone(),
            columns,
        },
        cursor,
    ))
}

/// Comma-separated expressions, terminated by any of `delimiters`. The
/// delimiter check runs before each element, so a comma dangling in front of
/// the delimiter is a failure rather than silently accepted. The delimiter
/// itself is not consumed.
fn parse_expressions(
    tokens: &[Token],
    cursor: usize,
    delimiters: &[Token],
) -> ParseResult<Vec<Expression>> {
    let mut expressions = Vec::new();
    let mut cursor = cursor;

    loop {
        let Some(current) = tokens.get(cursor) else {
            return Err(cursor);
        };
        if delimiters.contains(current) {
            break;
        }

        if !expressions.is_empty() {
            match parse_token(tokens, cursor, &symbol_token(keywords::COMMA)) {
                Some(next) => cursor = next,
                None => {
                    report(tokens, cursor, "Maybe you missed comma");
                    return Err(cursor);
                }
            }
        }

        let Some((expression, next)) = parse_expression(tokens, cursor) else {
            report(tokens, cursor, "Expected expression");
            return Err(cursor);
        };
        cursor = next;
        expressions.push(expression);
    }

    Ok((expressions, cursor))
}

/// One literal expression: an identifier, numeric, or string token.
fn parse_expression(tokens: &[Token], cursor: usize) -> Option<(Expression, usize)> {
    for kind in [TokenKind::Identifier, TokenKind::Numeric, TokenKind::String] {
        if let Some((token, next)) = parse_token_kind(tokens, cursor, kind) {
            return Some((Expression::Literal(token.clone()), next));
        }
    }
    None
}

/// Comma-separated `name datatype` pairs, terminated by `delimiter` (not
/// consumed). The datatype is any reserved word.
fn parse_column_defs(
    tokens: &[Token],
    cursor: usize,
    delimiter: &Token,
) -> ParseResult<Vec<ColumnMeta>> {
    let mut columns = Vec::new();
    let mut cursor = cursor;

    loop {
        let Some(current) = tokens.get(cursor) else {
            return Err(cursor);
        };
        if current == delimiter {
            break;
        }

        if !columns.is_empty() {
            cursor = expect_token(
                tokens,
                cursor,
                &symbol_token(keywords::COMMA),
                "Expected comma",
            )?;
        }

        let (name, next) =
            expect_kind(tokens, cursor, TokenKind::Identifier, "Expected column name")?;
        cursor = next;

        let (datatype, next) = expect_kind(
            tokens,
            cursor,
            TokenKind::Reserved,
            "Expected column datatype definition",
        )?;
        cursor = next;

        columns.push(ColumnMeta {
            name: name.clone(),
            datatype: datatype.clone(),
        });
    }

    Ok((columns, cursor))
}

/// Consumes the token at the cursor if it matches `expected` by value and
/// kind.
fn parse_token(tokens: &[Token], cursor: usize, expected: &Token) -> Option<usize> {
    let token = tokens.get(cursor)?;
    (token == expected).then_some(cursor + 1)
}

/// Consumes the token at the cursor if it has the given kind.
fn parse_token_kind(tokens: &[Token], cursor: usize, kind: TokenKind) -> Option<(&Token, usize)> {
    let token = tokens.get(cursor)?;
    (token.kind == kind).then(|| (token, cursor + 1))
}

fn expect_token(
    tokens: &[Token],
    cursor: usize,
    expected: &Token,
    hint: &str,
) -> Result<usize, usize> {
    match parse_token(tokens, cursor, expected) {
        Some(next) => Ok(next),
        None => {
            report(tokens, cursor, hint);
            Err(cursor)
        }
    }
}

fn expect_kind<'a>(
    tokens: &'a [Token],
    cursor: usize,
    kind: TokenKind,
    hint: &str,
) -> Result<(&'a Token, usize), usize> {
    match parse_token_kind(tokens, cursor, kind) {
        Some(found) => Ok(found),
        None => {
            report(tokens, cursor, hint);
            Err(cursor)
        }
    }
}

/// Advisory diagnostic at the cursor position, or at the last token when the
/// cursor has run off the end.
fn report(tokens: &[Token], cursor: usize, hint: &str) {
    match tokens.get(cursor).or_else(|| tokens.last()) {
        Some(token) => debug!(
            "[{}, {}]: {}, got: {}",
            token.location.line, token.location.column, hint, token.value
        ),
        None => debug!("{}, got: end of input", hint),
    }
}

fn parse_failure(tokens: &[Token], cursor: usize) -> Error {
    let token = tokens.get(cursor).or_else(|| tokens.last());
    Error::Parse {
        location: token.map(|t| t.location).unwrap_or_default(),
        near: token.map(|t| t.value.clone()),
    }
}

fn reserved_token(value: &str) -> Token {
    Token::new(value, TokenKind::Reserved, Location::default())
}

fn symbol_token(value: &str) -> Token {
    Token::new(value, TokenKind::Symbol, Location::default())
}
