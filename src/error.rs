use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: &'static str, message: String },

    #[error("no such element: {what}")]
    NotFound { what: &'static str },

    #[error("illegal state: {message}")]
    IllegalState { message: String },

    #[error("concurrent modification (expected mod count {expected}, found {actual})")]
    ConcurrentModification { expected: u64, actual: u64 },
}

impl Error {
    pub fn invalid_arg(name: &'static str, message: impl Into<String>) -> Error {
        Error::InvalidArgument {
            name,
            message: message.into(),
        }
    }

    pub fn not_found(what: &'static str) -> Error {
        Error::NotFound { what }
    }

    pub fn illegal_state(message: impl Into<String>) -> Error {
        Error::IllegalState {
            message: message.into(),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_illegal_state(&self) -> bool {
        matches!(self, Error::IllegalState { .. })
    }

    pub fn is_concurrent_modification(&self) -> bool {
        matches!(self, Error::ConcurrentModification { .. })
    }
}
