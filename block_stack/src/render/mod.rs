//! Renderer trait and the default outlined-cube implementation.

mod outlined_cube;

use bevy::prelude::*;

use crate::scene::StackSettings;

pub use outlined_cube::OutlinedCubeRenderer;
pub(crate) use outlined_cube::box_edges;

/// Mesh handles shared by every block: one solid box and one edge outline.
#[derive(Resource, Clone, Debug)]
pub struct BlockGeometry {
    pub face: Handle<Mesh>,
    pub edges: Handle<Mesh>,
}

/// Entities and per-instance material created for one block.
#[derive(Clone, Debug)]
pub struct SpawnedBlock {
    pub group: Entity,
    pub outline: Entity,
    pub face: Entity,
    pub face_material: Handle<StandardMaterial>,
}

pub trait BlockRenderer: Send + Sync + 'static {
    fn setup(&self, _app: &mut App) {}

    fn geometry(&self, meshes: &mut Assets<Mesh>, settings: &StackSettings) -> BlockGeometry;

    fn spawn_block(
        &self,
        commands: &mut Commands,
        geometry: &BlockGeometry,
        materials: &mut Assets<StandardMaterial>,
        settings: &StackSettings,
        translation: Vec3,
    ) -> SpawnedBlock;
}

#[derive(Resource)]
pub struct RendererResource(pub Box<dyn BlockRenderer>);

impl RendererResource {
    pub fn new(renderer: impl BlockRenderer) -> Self {
        Self(Box::new(renderer))
    }
}
