use std::path::PathBuf;
use std::{error::Error, fmt};

#[derive(Debug)]
pub enum ParseError {
    MissingField { index: usize, line: String },
    UnsupportedTemplate(usize),
}

impl std::error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ParseError::*;
        match self {
            MissingField { index, line } => write!(f, "MissingField: group {} in {:?}", index, line),
            UnsupportedTemplate(n) => write!(f, "UnsupportedTemplate: {} fields", n),
        }
    }
}

#[derive(Debug)]
pub enum PublishError {
    Http(reqwest::Error),
    Status { status: u16, body: String },
    InvalidHeader(String),
    MissingId,
}

impl std::error::Error for PublishError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use PublishError::*;
        match self {
            Http(e) => Some(e as &dyn Error),
            _ => None,
        }
    }
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PublishError::*;
        match self {
            Http(_) => write!(f, "HttpError"),
            Status { status, body } => write!(f, "StatusError: {} {}", status, body),
            InvalidHeader(s) => write!(f, "InvalidHeader: {}", s),
            MissingId => write!(f, "MissingId"),
        }
    }
}

impl From<reqwest::Error> for PublishError {
    fn from(error: reqwest::Error) -> Self {
        PublishError::Http(error)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("clippings file not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("failed to read clippings file")]
    Io(#[from] std::io::Error),
    #[error("Notion API token is required. Set NOTION_API_TOKEN or use --api-token")]
    MissingToken,
    #[error("configuration error: {0}")]
    Config(String),
    #[error("failed to publish page for {title:?}")]
    Publish {
        title: String,
        #[source]
        source: PublishError,
    },
}
