//! Shared material and color helpers for faces, outlines and the ground grid.

use bevy::prelude::*;

pub const FACE_COLOR: Color = Color::srgb(1.0, 1.0, 0.0);
pub const HIGHLIGHT_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);
pub const OUTLINE_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);
pub const GRID_COLOR: Color = Color::srgb(0.533, 0.533, 0.533);

/// Flat-colored material; the scene has no lights.
pub fn unlit_material(
    materials: &mut Assets<StandardMaterial>,
    color: Color,
) -> Handle<StandardMaterial> {
    materials.add(StandardMaterial {
        base_color: color,
        unlit: true,
        ..default()
    })
}

pub fn set_base_color(
    materials: &mut Assets<StandardMaterial>,
    handle: &Handle<StandardMaterial>,
    color: Color,
) {
    if let Some(material) = materials.get_mut(handle) {
        material.base_color = color;
    }
}
