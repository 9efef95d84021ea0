use super::keywords;
use super::token::{Cursor, Token, TokenKind};
use crate::error::Error;

/// A recognizer inspects the source at the cursor and either consumes input,
/// returning the advanced cursor and possibly a token (whitespace is consumed
/// without emitting one), or declines with `None` so the next recognizer in
/// priority order can try.
type Recognizer = fn(&str, Cursor) -> Option<(Option<Token>, Cursor)>;

const RECOGNIZERS: [Recognizer; 5] = [
    scan_reserved,
    scan_symbol,
    scan_string,
    scan_numeric,
    scan_identifier,
];

/// Converts the whole source into tokens, left to right.
///
/// Fails with [`Error::Lex`] when no recognizer matches at the current
/// position; the error carries the position and the previously accepted
/// token's value as a hint.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    let mut tokens = Vec::new();
    let mut cursor = Cursor::default();

    'source: while cursor.position < source.len() {
        for recognize in RECOGNIZERS {
            if let Some((token, next)) = recognize(source, cursor) {
                if let Some(token) = token {
                    tokens.push(token);
                }
                cursor = next;
                continue 'source;
            }
        }

        return Err(Error::Lex {
            location: cursor.location,
            near: tokens.last().map(|token| token.value.clone()),
        });
    }

    Ok(tokens)
}

fn scan_reserved(source: &str, cursor: Cursor) -> Option<(Option<Token>, Cursor)> {
    let word = keywords::longest_match(source, &cursor, &keywords::RESERVED_WORDS)?;

    let mut next = cursor;
    next.position += word.len();
    next.location.column += word.len();

    Some((
        Some(Token::new(word, TokenKind::Reserved, cursor.location)),
        next,
    ))
}

/// Punctuation, and the only recognizer that handles whitespace: one
/// whitespace character is consumed per call without emitting a token. A
/// newline bumps the line counter and resets the column — nothing else
/// touches line tracking.
fn scan_symbol(source: &str, cursor: Cursor) -> Option<(Option<Token>, Cursor)> {
    let ch = source[cursor.position..].chars().next()?;

    if ch.is_whitespace() {
        let mut next = cursor;
        next.position += ch.len_utf8();
        if ch == '\n' {
            next.location.line += 1;
            next.location.column = 0;
        } else {
            next.location.column += 1;
        }
        return Some((None, next));
    }

    let symbol = keywords::longest_match(source, &cursor, &keywords::SYMBOLS)?;

    let mut next = cursor;
    next.position += symbol.len();
    next.location.column += symbol.len();

    Some((
        Some(Token::new(symbol, TokenKind::Symbol, cursor.location)),
        next,
    ))
}

fn scan_string(source: &str, cursor: Cursor) -> Option<(Option<Token>, Cursor)> {
    let (value, next) = scan_delimited(source, cursor, '\'')?;
    Some((
        Some(Token::new(value, TokenKind::String, cursor.location)),
        next,
    ))
}

/// Numeric literals: `digit+ ('.' digit*)? (('e'|'E') ('+'|'-')? digit+)?`,
/// with a leading `.` accepted. A malformed interior (second `.`, second
/// exponent, exponent without a following digit) rejects the whole candidate
/// rather than emitting a shorter token; an ordinary non-extending character
/// just stops the scan.
fn scan_numeric(source: &str, cursor: Cursor) -> Option<(Option<Token>, Cursor)> {
    let bytes = source.as_bytes();
    let mut next = cursor;
    let mut has_period = false;
    let mut has_exponent = false;

    while next.position < bytes.len() {
        let ch = bytes[next.position];

        let is_digit = ch.is_ascii_digit();
        let is_period = ch == b'.';
        let is_exp_marker = ch == b'e' || ch == b'E';

        if next.position == cursor.position {
            if !is_digit && !is_period {
                return None;
            }
            has_period = is_period;
            next.position += 1;
            next.location.column += 1;
            continue;
        }

        if is_period {
            if has_period || has_exponent {
                return None;
            }
            has_period = true;
            next.position += 1;
            next.location.column += 1;
            continue;
        }

        if is_exp_marker {
            if has_exponent {
                return None;
            }
            has_exponent = true;

            // The marker needs at least one digit behind it, after an
            // optional sign.
            let mut digits = next.position + 1;
            if digits < bytes.len() && (bytes[digits] == b'+' || bytes[digits] == b'-') {
                digits += 1;
            }
            if digits >= bytes.len() || !bytes[digits].is_ascii_digit() {
                return None;
            }

            next.location.column += digits - next.position;
            next.position = digits;
            continue;
        }

        if !is_digit {
            break;
        }
        next.position += 1;
        next.location.column += 1;
    }

    if next.position == cursor.position {
        return None;
    }

    let value = &source[cursor.position..next.position];
    Some((
        Some(Token::new(value, TokenKind::Numeric, cursor.location)),
        next,
    ))
}

/// Identifiers: a double-quoted run (case and content preserved verbatim) or
/// an unquoted run starting with an ASCII letter, folded to lowercase.
fn scan_identifier(source: &str, cursor: Cursor) -> Option<(Option<Token>, Cursor)> {
    let mut chars = source[cursor.position..].chars();
    let first = chars.next()?;

    if first == '"' {
        let (value, next) = scan_delimited(source, cursor, '"')?;
        return Some((
            Some(Token::new(value, TokenKind::Identifier, cursor.location)),
            next,
        ));
    }

    if !first.is_ascii_alphabetic() {
        return None;
    }

    let mut next = cursor;
    next.position += 1;
    next.location.column += 1;

    for ch in chars {
        if !(ch.is_ascii_alphanumeric() || ch == '$' || ch == '_') {
            break;
        }
        next.position += ch.len_utf8();
        next.location.column += 1;
    }

    let value = source[cursor.position..next.position].to_ascii_lowercase();
    Some((
        Some(Token::new(value, TokenKind::Identifier, cursor.location)),
        next,
    ))
}

/// Scans a run delimited by `delimiter`, starting at the cursor. A doubled
/// delimiter escapes a literal delimiter and is kept as two characters in the
/// value. Returns `None` when the input does not start with the delimiter or
/// no unescaped closing delimiter is found before the end of the source.
fn scan_delimited(source: &str, cursor: Cursor, delimiter: char) -> Option<(String, Cursor)> {
    let mut chars = source[cursor.position..].chars().peekable();
    if chars.next()? != delimiter {
        return None;
    }

    let mut next = cursor;
    next.position += delimiter.len_utf8();
    next.location.column += 1;

    let mut value = String::new();

    while let Some(ch) = chars.next() {
        next.position += ch.len_utf8();
        next.location.column += 1;

        if ch == delimiter {
            if chars.peek() == Some(&delimiter) {
                value.push(delimiter);
                value.push(delimiter);
                chars.next();
                next.position += delimiter.len_utf8();
                next.location.column += 1;
                continue;
            }
            return Some((value, next));
        }

        value.push(ch);
    }

    None
}
