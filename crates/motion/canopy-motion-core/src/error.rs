//! Parse errors for the string forms used by marker attributes and config.

use thiserror::Error;

/// Errors produced while parsing eases, trigger positions, toggle actions and
/// numeric attribute values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unknown ease `{0}`")]
    UnknownEase(String),
    #[error("malformed ease parameters in `{0}`")]
    MalformedEase(String),
    #[error("malformed anchor `{0}`")]
    Anchor(String),
    #[error("trigger position `{0}` must be `<element-edge> <viewport-edge>`")]
    Position(String),
    #[error("unknown toggle action `{0}`")]
    ToggleAction(String),
    #[error("toggle actions need four entries, found {0}")]
    ToggleActionCount(usize),
    #[error("unknown marker category `{0}`")]
    Category(String),
    #[error("attribute `{attribute}` is not a number: `{value}`")]
    Number { attribute: String, value: String },
}
