use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("WebDriver command failed: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),

    #[error("WebDriver session could not be established: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    #[error("Element not found: {0}")]
    MissingElement(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
