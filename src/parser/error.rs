use crate::{Error as RollError, ErrorKind};


/// Errors raised while compiling dice notation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParserError {
    #[error("At position {0} - {1}")]
    AtPosition(usize, Box<ParserError>),

    #[error("Invalid token: {0}")]
    Token(char),

    #[error("Invalid number: {0}")]
    Number(#[from] std::num::ParseIntError),

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Roll error - {0}")]
    RollError(Box<RollError>),

    #[error("Parenthesis was not closed")]
    UnclosedParenthesis,

    #[error("Closing parenthesis without an opening one")]
    UnexpectedParenthesis,

    #[error("Empty dice expression")]
    EmptySegment,

    #[error("Expected dice, got {0}")]
    MissingDice(String),

    #[error("Expected a number after the operator, got {0}")]
    MissingOperand(String),

    #[error("Unexpected token: {0}")]
    UnexpectedToken(String),

    #[error("Value out of range: {0}")]
    OutOfRange(String),
}

impl ParserError {
    /// The error without its position.
    pub fn err(&self) -> &Self {
        match self {
            ParserError::AtPosition(_, err) => err.as_ref(),
            other => other
        }
    }

    /// Position in the notation at which the error was found, if known.
    pub fn pos(&self) -> Option<&usize> {
        match self {
            ParserError::AtPosition(position, _) => Some(position),
            _ => None
        }
    }

    /// Attaches a position, keeping the first one if already set.
    pub fn at_pos(self, position: usize) -> Self {
        match self {
            ParserError::AtPosition(_, _) => self,
            other => ParserError::AtPosition(position, Box::new(other))
        }
    }

    /// Returns the [`ErrorKind`] this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self.err() {
            ParserError::UnknownAlgorithm(_) => ErrorKind::UnknownAlgorithm,
            ParserError::RollError(err) => err.kind(),
            _ => ErrorKind::Syntax
        }
    }
}

impl From<RollError> for ParserError {
    fn from(value: RollError) -> Self {
        match value {
            RollError::UnknownAlgorithm(token) => ParserError::UnknownAlgorithm(token),
            other => ParserError::RollError(Box::new(other))
        }
    }
}

pub type Result<T> = std::result::Result<T, ParserError>;
