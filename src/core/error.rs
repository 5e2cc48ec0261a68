use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Input Error: {0}")]
    InputValidation(String),

    #[error("Unexpected computation error: {0}")]
    UnexpectedComputation(String),
}

pub type SimulationOutcome<T> = Result<T, SimulationError>;
