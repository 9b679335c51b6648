//! The value conversion contract and its built-in implementations.
mod contract;
mod slot;
mod types;

pub use contract::{ConversionError, FromToken, Value};
pub use slot::Handle;
pub(crate) use slot::{ListSlot, MapSlot, OptionalSlot, ScalarSlot};
pub use types::{ExistingDir, ExistingFile, HostPort, OpenedFile};
