use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::render_asset::RenderAssetUsages;

use crate::render::{BlockGeometry, BlockRenderer, SpawnedBlock};
use crate::scene::{materials, BlockFace, BlockGroup, BlockOutline, StackSettings};

/// Draws each block as a solid box with a separately colored edge outline.
#[derive(Default)]
pub struct OutlinedCubeRenderer;

impl BlockRenderer for OutlinedCubeRenderer {
    fn geometry(&self, meshes: &mut Assets<Mesh>, settings: &StackSettings) -> BlockGeometry {
        let size = settings.block_size;
        BlockGeometry {
            face: meshes.add(Cuboid::new(size.x, size.y, size.z)),
            edges: meshes.add(edge_mesh(size / 2.0)),
        }
    }

    fn spawn_block(
        &self,
        commands: &mut Commands,
        geometry: &BlockGeometry,
        materials_res: &mut Assets<StandardMaterial>,
        settings: &StackSettings,
        translation: Vec3,
    ) -> SpawnedBlock {
        let outline_material = materials::unlit_material(materials_res, settings.outline_color);
        let face_material = materials::unlit_material(materials_res, settings.face_color);

        let mut outline = Entity::PLACEHOLDER;
        let mut face = Entity::PLACEHOLDER;
        let group = commands
            .spawn((
                BlockGroup,
                Transform::from_translation(translation),
                Visibility::Visible,
            ))
            .with_children(|builder| {
                // outline is child 0, face is child 1
                outline = builder
                    .spawn((
                        BlockOutline,
                        Mesh3d(geometry.edges.clone()),
                        MeshMaterial3d(outline_material),
                    ))
                    .id();
                face = builder
                    .spawn((
                        BlockFace,
                        Mesh3d(geometry.face.clone()),
                        MeshMaterial3d(face_material.clone()),
                    ))
                    .id();
            })
            .id();

        SpawnedBlock {
            group,
            outline,
            face,
            face_material,
        }
    }
}

/// The twelve edges of an axis-aligned box centred on the origin.
pub(crate) fn box_edges(half: Vec3) -> [(Vec3, Vec3); 12] {
    let corner = |x: f32, y: f32, z: f32| Vec3::new(x * half.x, y * half.y, z * half.z);
    [
        // bottom
        (corner(-1., -1., -1.), corner(1., -1., -1.)),
        (corner(1., -1., -1.), corner(1., -1., 1.)),
        (corner(1., -1., 1.), corner(-1., -1., 1.)),
        (corner(-1., -1., 1.), corner(-1., -1., -1.)),
        // top
        (corner(-1., 1., -1.), corner(1., 1., -1.)),
        (corner(1., 1., -1.), corner(1., 1., 1.)),
        (corner(1., 1., 1.), corner(-1., 1., 1.)),
        (corner(-1., 1., 1.), corner(-1., 1., -1.)),
        // verticals
        (corner(-1., -1., -1.), corner(-1., 1., -1.)),
        (corner(1., -1., -1.), corner(1., 1., -1.)),
        (corner(1., -1., 1.), corner(1., 1., 1.)),
        (corner(-1., -1., 1.), corner(-1., 1., 1.)),
    ]
}

fn edge_mesh(half: Vec3) -> Mesh {
    let positions: Vec<[f32; 3]> = box_edges(half)
        .iter()
        .flat_map(|(a, b)| [a.to_array(), b.to_array()])
        .collect();
    Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_touch_every_corner_three_times() {
        let edges = box_edges(Vec3::new(0.5, 0.25, 0.5));
        let endpoints: Vec<Vec3> = edges.iter().flat_map(|(a, b)| [*a, *b]).collect();

        for x in [-0.5, 0.5] {
            for y in [-0.25, 0.25] {
                for z in [-0.5, 0.5] {
                    let corner = Vec3::new(x, y, z);
                    let touching = endpoints.iter().filter(|p| **p == corner).count();
                    assert_eq!(touching, 3, "corner {corner:?}");
                }
            }
        }
    }

    #[test]
    fn edge_mesh_is_a_line_list_of_24_vertices() {
        let mesh = edge_mesh(Vec3::splat(0.5));
        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::LineList);
        assert_eq!(mesh.count_vertices(), 24);
    }

    #[test]
    fn spawned_block_has_outline_then_face() {
        let mut world = World::new();
        let mut meshes = Assets::<Mesh>::default();
        let mut material_assets = Assets::<StandardMaterial>::default();
        let settings = StackSettings::default();
        let renderer = OutlinedCubeRenderer;
        let geometry = renderer.geometry(&mut meshes, &settings);

        let mut queue = bevy::ecs::world::CommandQueue::default();
        let spawned = {
            let mut commands = Commands::new(&mut queue, &world);
            renderer.spawn_block(
                &mut commands,
                &geometry,
                &mut material_assets,
                &settings,
                Vec3::new(0.0, 0.25, 0.0),
            )
        };
        queue.apply(&mut world);

        let children = world.get::<Children>(spawned.group).unwrap();
        assert_eq!(&children[..], &[spawned.outline, spawned.face]);
        assert!(world.get::<BlockFace>(spawned.face).is_some());
        assert!(world.get::<BlockOutline>(spawned.outline).is_some());
        assert_eq!(
            world.get::<Transform>(spawned.group).unwrap().translation,
            Vec3::new(0.0, 0.25, 0.0)
        );

        let face_color = material_assets.get(&spawned.face_material).unwrap().base_color;
        assert_eq!(face_color, settings.face_color);
        assert_eq!(material_assets.len(), 2);
    }
}
