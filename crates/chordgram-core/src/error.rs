pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("adjacency matrix is not square: row {row} has {actual} entries, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("name count ({names}) does not match adjacency matrix size ({rows})")]
    NameCountMismatch { names: usize, rows: usize },

    #[error("invalid weight at [{row}][{column}]: {value} (weights must be finite and >= 0)")]
    InvalidWeight { row: usize, column: usize, value: f64 },

    #[error("input JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("input JSON5 error: {0}")]
    Json5(#[from] json5::Error),

    #[error("input YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {message}")]
    InvalidConfig { message: String },
}
