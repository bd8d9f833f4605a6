pub mod args;
mod dispatch;
pub mod error;
pub mod host;
pub mod mixin;
pub mod receiver;
pub mod registry;

// Re-export key types for convenience.
pub use error::{PlugError, Result};
pub use host::Pluggable;
pub use mixin::{Mixin, MixinMethod, MixinOptions, Output};
pub use receiver::Receiver;
pub use registry::{Plug, PlugRegistry, plug_fn};
