//! The declaration surface: parameter configuration and typed binding.
mod core;
mod parameter;

pub use self::core::Binder;
pub use parameter::{FlagSpec, PositionalSpec};
