/// Errors produced by plug registration, mixin import, and dispatch.
#[derive(Debug, thiserror::Error)]
pub enum PlugError {
    #[error("method {scope}::{name} does not exist")]
    UnknownOperation { scope: String, name: String },

    #[error("cannot register two plugs named {name}")]
    Conflict { name: String },

    #[error("{mixin}::{method} must declare that it returns a plug")]
    MalformedMixin { mixin: String, method: String },

    #[error("plug on {scope} needs an instance receiver but was called on the type")]
    MissingReceiver { scope: String },

    #[error("too few arguments: expected {expected}, got {given}")]
    Arity { expected: usize, given: usize },

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Invocation(String),
}

pub type Result<T> = std::result::Result<T, PlugError>;
