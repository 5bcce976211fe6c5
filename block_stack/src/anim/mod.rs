mod removal;
mod tween;

pub use removal::{RemovalAnimation, RemovalStep};
pub use tween::Tween;
