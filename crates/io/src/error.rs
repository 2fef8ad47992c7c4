use std::fmt;

#[derive(Debug)]
pub enum IoError {
    /// File open/read/write failure.
    Io(String),
    /// Malformed CSV record.
    Csv(String),
    /// Nothing to read or nothing to write.
    Empty(String),
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
            Self::Empty(msg) => write!(f, "empty: {msg}"),
        }
    }
}

impl std::error::Error for IoError {}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}
