use std::path::PathBuf;

use crate::value::ThingId;

/// Alias for `Result<T, TabError>`.
pub type TabResult<T> = Result<T, TabError>;

/// Errors that can occur while building things or dispatching capabilities.
#[derive(Debug, thiserror::Error)]
pub enum TabError {
    /// A referenced model name has no entry in the model store.
    #[error("model not found: \"{0}\"")]
    ModelNotFound(String),

    /// A thing lists a behavior the behavior store does not know.
    #[error("behavior not found: \"{0}\"")]
    BehaviorNotFound(String),

    /// A model's `base` chain leads back to a model still being resolved.
    #[error("cyclic inheritance: {}", chain.join(" -> "))]
    CyclicInheritance {
        /// The resolution chain, ending with the revisited name.
        chain: Vec<String>,
    },

    /// A model reference or `base` declaration has an unsupported shape.
    #[error("invalid model input: {0}")]
    InvalidModelInput(String),

    /// A capability was invoked but no behavior of the thing provides it.
    #[error("no such capability: \"{0}\"")]
    NoSuchCapability(String),

    /// A capability was invoked with missing or ill-typed arguments.
    #[error("invalid argument to \"{capability}\": {reason}")]
    InvalidArgument {
        /// The capability being invoked.
        capability: String,
        /// What was wrong with the arguments.
        reason: String,
    },

    /// A thing id does not exist in the world.
    #[error("thing not found: {0}")]
    ThingNotFound(ThingId),

    /// A catalog file could not be read or parsed.
    #[error("catalog error in {}: {message}", path.display())]
    Catalog {
        /// The offending file or directory.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },
}
