pub(crate) mod blocks;
pub(crate) mod grid;
pub(crate) mod materials;
pub(crate) mod picking;

pub use blocks::{
    add_block, apply_stack_commands, clear_block, drive_removal, setup_scene, stack_plugin,
    BlockFace, BlockGroup, BlockOutline, BlockStack, FrameStage, StackEntry, StackSettings,
};
pub use grid::{GridSettings, GroundGrid};
pub use picking::{
    click_pick_system, intersect_stack, picking_plugin, pointer_to_ndc, ray_from_ndc,
    select_face, HitKind, Intersection, PickRay, PointerCapture,
};
