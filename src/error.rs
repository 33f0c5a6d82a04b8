use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoltmeterError {
    #[error("No suitable GPU adapter found: {0}")]
    AdapterRequest(String),

    #[error("Failed to create GPU device: {0}")]
    DeviceInit(String),

    #[error("GPU transfer failed: {0}")]
    Transfer(String),

    #[error("GPU compute failed: {0}")]
    Compute(String),

    #[error("GPU is not available")]
    Unavailable,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VoltmeterError>;
