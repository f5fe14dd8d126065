use thiserror::Error;

/// Main crate error type.
///
/// All variants are recoverable by the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // === Classification errors ===
    /// Ratio requested for a position without debt, or a ratio that is NaN/negative
    #[error("Collateral ratio is undefined for position owned by {owner}")]
    UndefinedRatio { owner: String },

    /// Price is non-positive, NaN or infinite
    #[error("Invalid price for {symbol}: {price}")]
    InvalidPrice { symbol: String, price: f64 },

    /// Price snapshot has no entry for the symbol
    #[error("Unknown token: {0}")]
    UnknownToken(String),

    /// Amount is negative or not finite
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    // === Parsing errors ===
    /// Position filter string could not be parsed
    #[error("Invalid position filter: {0}")]
    InvalidFilter(String),

    /// Risk category string could not be parsed
    #[error("Invalid risk category: {0}")]
    InvalidCategory(String),

    /// JSON parse error
    #[error("Json parse error: {0}")]
    JsonParse(String),

    // === Environment errors ===
    /// Key-value store read or write failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Config load or validation failure
    #[error("Config error: {0}")]
    Config(String),

    // === HTTP errors ===
    /// Client HTTP error (4xx)
    #[error("Client error: status code: {status_code}, error message: {error_message}")]
    ClientRequest {
        status_code: u16,
        error_message: String,
    },

    /// Server HTTP error (5xx)
    #[error("Server error: status code: {status_code}, error message: {error_message}")]
    ServerRequest {
        status_code: u16,
        error_message: String,
    },

    /// Generic request error
    #[error("Generic request error: {0}")]
    GenericRequest(String),
}

impl Error {
    /// Create an invalid price error
    pub fn invalid_price(symbol: impl Into<String>, price: f64) -> Self {
        Error::InvalidPrice {
            symbol: symbol.into(),
            price,
        }
    }

    /// Create an undefined ratio error
    pub fn undefined_ratio(owner: impl Into<String>) -> Self {
        Error::UndefinedRatio {
            owner: owner.into(),
        }
    }

    /// Is this error a price problem the caller should render as "unavailable"?
    pub fn is_price_unavailable(&self) -> bool {
        matches!(self, Error::InvalidPrice { .. } | Error::UnknownToken(_))
    }

    /// Is this error a network failure (retry or fall back)?
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Error::ClientRequest { .. } | Error::ServerRequest { .. } | Error::GenericRequest(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::JsonParse(err.to_string())
    }
}
