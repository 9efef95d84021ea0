use super::token::Cursor;

// Reserved words, in canonical lowercase. `int` and `into` overlap on
// purpose: the matcher must pick the longest exact match.
pub const SELECT: &str = "select";
pub const FROM: &str = "from";
pub const CREATE: &str = "create";
pub const TABLE: &str = "table";
pub const AS: &str = "as";
pub const INSERT: &str = "insert";
pub const INTO: &str = "into";
pub const VALUES: &str = "values";
pub const INT: &str = "int";
pub const TEXT: &str = "text";

pub const RESERVED_WORDS: [&str; 10] = [
    SELECT, FROM, CREATE, TABLE, AS, INSERT, INTO, VALUES, INT, TEXT,
];

pub const SEMICOLON: &str = ";";
pub const ASTERISK: &str = "*";
pub const COMMA: &str = ",";
pub const LEFT_PAREN: &str = "(";
pub const RIGHT_PAREN: &str = ")";

pub const SYMBOLS: [&str; 5] = [SEMICOLON, ASTERISK, COMMA, LEFT_PAREN, RIGHT_PAREN];

/// Maximal-munch match of `options` against the source at `cursor`.
///
/// Consumes one character at a time (case-folded to ASCII lowercase) and keeps
/// a bitset of candidates still consistent with the accumulated prefix. A
/// candidate is retired once it has matched exactly (recording it as the best
/// match so far) or once the prefix can no longer grow into it. The scan stops
/// when the input runs out or every candidate is retired, and returns the
/// longest candidate that matched exactly at some point.
pub(crate) fn longest_match(
    source: &str,
    cursor: &Cursor,
    options: &[&'static str],
) -> Option<&'static str> {
    debug_assert!(options.len() < u32::BITS as usize);

    let mut eliminated = 0u32;
    let all = (1u32 << options.len()) - 1;
    let mut value = String::new();
    let mut best: Option<&'static str> = None;

    for ch in source[cursor.position..].chars() {
        value.push(ch.to_ascii_lowercase());

        for (index, option) in options.iter().enumerate() {
            if eliminated & (1 << index) != 0 {
                continue;
            }

            if *option == value {
                eliminated |= 1 << index;
                if best.map_or(true, |found| option.len() > found.len()) {
                    best = Some(option);
                }
                continue;
            }

            if !option.starts_with(value.as_str()) {
                eliminated |= 1 << index;
            }
        }

        if eliminated == all {
            break;
        }
    }

    best
}
