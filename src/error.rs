use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipeLensError {
    #[error("Unsupported file '{0}': pipeline must be a YAML file (.yml or .yaml)")]
    UnsupportedExtension(String),

    #[error("Invalid pipeline document: {0}")]
    InvalidDocument(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipeLensError>;
