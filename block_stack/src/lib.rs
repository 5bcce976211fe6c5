//! Block stack scene — outlined cubes stacked on a ground grid, picked by
//! clicking and collapsed with a twisting animation.
//!
//! Library root: scene, camera, animation, data and SDK modules.

pub mod anim;
pub mod camera;
pub mod config;
pub mod data;
pub mod render;
pub mod scene;
mod ui;

pub mod prelude;
pub mod sdk;

pub use camera::{orbit_camera_plugin, AutoRotate, OrbitController};
pub use data::{BlockClick, StackCommand, StackHandle};
pub use scene::{
    add_block, clear_block, picking_plugin, stack_plugin, BlockFace, BlockGroup, BlockOutline,
    BlockStack, FrameStage, GridSettings, GroundGrid, HitKind, Intersection, PickRay,
    PointerCapture, StackEntry, StackSettings,
};
pub use ui::hud_plugin;
