use thiserror::Error;

#[derive(Error, Debug)]
pub enum VendingError {
    #[error("unknown drink: {0}")]
    UnknownDrink(String),
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
    #[error("card reader fault: {0}")]
    CardReader(String),
    #[error("machine is no longer running")]
    MachineUnavailable,
}

pub type Result<T> = std::result::Result<T, VendingError>;
