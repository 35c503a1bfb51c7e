//! Error types for semlayout operations.

use thiserror::Error;

/// Errors that can occur while cleaning, formatting or extracting markup.
///
/// The first four variants are user errors: they are deterministic for a
/// given input and are caused by the content or presentation supplied, so a
/// caller should show the message rather than treat it as a bug.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid markup: {0}")]
    InvalidMarkup(String),

    #[error("{0}")]
    IncorrectHeadings(String),

    #[error("{0}")]
    BadStructure(String),

    /// Specialisation of [`Error::BadStructure`] for over-wide rows.
    #[error("{0}")]
    TooManyColumns(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for errors caused by the user's content or presentation choices.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidMarkup(_)
                | Error::IncorrectHeadings(_)
                | Error::BadStructure(_)
                | Error::TooManyColumns(_)
        )
    }

    /// True for `BadStructure` and its `TooManyColumns` specialisation.
    pub fn is_bad_structure(&self) -> bool {
        matches!(self, Error::BadStructure(_) | Error::TooManyColumns(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
