use thiserror::Error;

/// Failures talking to a market data source
#[derive(Error, Debug)]
pub enum DataError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response shape for {symbol}: {reason}")]
    InvalidResponse { symbol: String, reason: String },
}

/// Failures loading or saving a document
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip container error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Template is missing {0}")]
    MissingPart(String),

    #[error("Malformed document markup: {0}")]
    Malformed(String),
}

impl From<quick_xml::events::attributes::AttrError> for DocumentError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        DocumentError::Xml(quick_xml::Error::InvalidAttr(err))
    }
}
