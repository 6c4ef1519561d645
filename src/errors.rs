/*!
 * Error types for the xlsx-translator application.
 *
 * This module contains custom error types for the different stages of a
 * translation run, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with translation provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error body returned by the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors that can occur while reading or writing spreadsheet documents
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    /// The document could not be parsed as a workbook
    #[error("Failed to read workbook: {0}")]
    Read(String),

    /// The package archive is damaged or incomplete
    #[error("Invalid workbook package: {0}")]
    Zip(String),

    /// A package part contains malformed XML
    #[error("Malformed XML in '{part}': {message}")]
    Xml {
        /// Package part name
        part: String,
        /// Parser message
        message: String,
    },

    /// The workbook has no worksheet to translate
    #[error("Workbook contains no sheets")]
    NoSheets,

    /// The output document could not be produced
    #[error("Failed to write workbook: {0}")]
    Write(String),
}

impl From<zip::result::ZipError> for SpreadsheetError {
    fn from(error: zip::result::ZipError) -> Self {
        Self::Zip(error.to_string())
    }
}

impl From<calamine::XlsxError> for SpreadsheetError {
    fn from(error: calamine::XlsxError) -> Self {
        Self::Read(error.to_string())
    }
}

/// Errors that end a translation run
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Missing file, missing credential or similar caller mistakes
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The credential probe was rejected or could not be performed
    #[error("API key check failed: {0}")]
    InvalidApiKey(String),

    /// A run is already being processed by this service
    #[error("A translation is already in progress")]
    AlreadyRunning,

    /// Too many batch-level provider failures in one run
    #[error("Too many API errors ({errors}), check the API key or its limits")]
    TooManyApiErrors {
        /// Number of failed batches when the run was aborted
        errors: usize,
        /// Last provider error observed
        #[source]
        last: ProviderError,
    },

    /// Error with the input or output document
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] SpreadsheetError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error in the configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from spreadsheet processing
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] SpreadsheetError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
