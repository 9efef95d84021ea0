use thiserror::Error;

use crate::sql::token::Location;

/// Terminal failures of the front end. Both kinds abort the whole call that
/// produced them; there is no partial-result recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No recognizer matched at `location`. `near` holds the previously
    /// accepted token's value, when there was one.
    #[error("unable to lex token at {location}{}", after(.near))]
    Lex {
        location: Location,
        near: Option<String>,
    },

    /// The token stream matched no statement grammar, or a statement was
    /// never terminated by a semicolon. `near` holds the offending token's
    /// value.
    #[error("unable to parse statement at {location}{}", after(.near))]
    Parse {
        location: Location,
        near: Option<String>,
    },
}

fn after(near: &Option<String>) -> String {
    match near {
        Some(value) => format!(", near {value:?}"),
        None => String::new(),
    }
}
