use std::path::PathBuf;
use thiserror::Error;

/// Conditions that abort the scan of one file.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Failed to read the input file
    #[error("IO error reading {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    /// A method names an owning type not declared in the same file
    #[error("no such class {class} for {function} (known types: {known})")]
    UnknownClass {
        class: String,
        function: String,
        known: String,
    },

    /// A parameter that does not fit the `type name` grammar
    #[error("malformed parameter `{param}` in ({params})")]
    MalformedParameter { param: String, params: String },
}

/// Result type for scanner operations
pub type ScanResult<T> = Result<T, ScanError>;
