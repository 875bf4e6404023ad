use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("Element not found: #{0}")]
    MissingElement(String),

    #[error("Card {0} has no tooltip element")]
    MissingTooltip(String),

    #[error("Card {0} has no search data")]
    MissingSearchData(String),

    #[error("CSV error on line {line}: {message}")]
    Csv { line: usize, message: String },

    #[error("Missing CSV column: {0}")]
    MissingColumn(String),

    #[error("Template error: {0}")]
    Template(String),
}

pub type Result<T> = std::result::Result<T, Error>;
