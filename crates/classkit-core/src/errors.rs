use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid declaration: {0}")]
    InvalidDeclaration(String),

    #[error("invalid trait: {0}")]
    InvalidTrait(String),

    #[error("undefined member `{0}`")]
    UndefinedMember(String),

    #[error("member `{0}` is not callable")]
    NotCallable(String),

    /// Failure raised by a user-supplied method body. The call protocol
    /// tears down scope state before this propagates.
    #[error("{0}")]
    Method(String),
}

impl Error {
    pub fn method(message: impl Into<String>) -> Self {
        Error::Method(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
