use thiserror::Error;

/// Raised while parsing a node's `"?in1 ?in2 => ?out1"` declaration string,
/// at construction time — never while ticking.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    #[error("declaration string has more than one `=>` separator")]
    MultipleSeparators,
    #[error("parameter name `{0}` is missing its leading `?` sigil")]
    MissingSigil(String),
}

/// Raised while parsing a parent's call-parameter string for a child.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CallArgsError {
    #[error("unterminated quoted string literal in call arguments: `{0}`")]
    UnterminatedString(String),
    #[error("call argument `{0}` is not a recognized literal or `?` reference")]
    UnrecognizedToken(String),
}
