//! Minimal prelude for SDK consumers.

pub use crate::config::{stack_config, StackConfig};
pub use crate::data::{BlockClick, StackCommand, StackHandle};
pub use crate::render::{BlockRenderer, OutlinedCubeRenderer};
pub use crate::sdk::BlockStackBuilder;
