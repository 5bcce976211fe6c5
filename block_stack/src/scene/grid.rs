//! Ground grid on the XZ plane.

use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::render_asset::RenderAssetUsages;

use crate::scene::materials;

#[derive(Clone, Debug)]
pub struct GridSettings {
    /// Edge length of the whole grid in world units.
    pub size: f32,
    /// Cells per side.
    pub divisions: u32,
    pub color: Color,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            size: 1000.0,
            divisions: 1000,
            color: materials::GRID_COLOR,
        }
    }
}

/// Marker for the ground grid entity.
#[derive(Component)]
pub struct GroundGrid;

pub fn grid_mesh(settings: &GridSettings) -> Mesh {
    let half = settings.size / 2.0;
    let step = settings.size / settings.divisions.max(1) as f32;

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity((settings.divisions as usize + 1) * 4);
    for i in 0..=settings.divisions {
        let k = -half + i as f32 * step;
        positions.push([-half, 0.0, k]);
        positions.push([half, 0.0, k]);
        positions.push([k, 0.0, -half]);
        positions.push([k, 0.0, half]);
    }

    Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
}

pub fn spawn_ground_grid(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials_res: &mut Assets<StandardMaterial>,
    settings: &GridSettings,
) -> Entity {
    commands
        .spawn((
            GroundGrid,
            Mesh3d(meshes.add(grid_mesh(settings))),
            MeshMaterial3d(materials::unlit_material(materials_res, settings.color)),
            Transform::IDENTITY,
        ))
        .id()
}
