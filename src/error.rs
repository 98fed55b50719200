use miette::Diagnostic;
use thiserror::Error;

/// Main error type for csssprite operations
#[derive(Error, Diagnostic, Debug)]
pub enum SpriteError {
    #[error("IO error: {0}")]
    #[diagnostic(code(csssprite::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(csssprite::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(csssprite::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Packing error: {message}")]
    #[diagnostic(code(csssprite::pack))]
    Pack {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Failed to emit sprite to {path}: {message}")]
    #[diagnostic(code(csssprite::emit))]
    Emit {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Failed to serialize report: {0}")]
    #[diagnostic(code(csssprite::report))]
    Report(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    #[diagnostic(code(csssprite::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, SpriteError>;
