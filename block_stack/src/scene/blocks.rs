//! Block stack: BlockStack resource, add/clear operations, collapse driver.

use std::f32::consts::PI;
use std::time::Duration;

use bevy::prelude::*;

use crate::anim::RemovalAnimation;
use crate::data::{StackChannel, StackCommand};
use crate::render::{BlockGeometry, BlockRenderer, RendererResource, SpawnedBlock};
use crate::scene::grid::{self, GridSettings};
use crate::scene::materials;

/// Per-frame ordering of the stack, camera and input systems.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameStage {
    Input,
    Stack,
    Camera,
}

/// Scene constants: block shape, stacking offsets, collapse timing, colors.
#[derive(Resource, Clone, Debug)]
pub struct StackSettings {
    pub block_size: Vec3,
    /// Height of the first block's centre above the ground.
    pub base_offset: f32,
    /// Vertical distance between consecutive blocks.
    pub step: f32,
    pub removal_duration: Duration,
    pub target_rotation: f32,
    /// Extra twist per stack index during the collapse.
    pub twist_step: f32,
    pub face_color: Color,
    pub highlight_color: Color,
    pub outline_color: Color,
    /// How close a ray must pass to an outline edge to count as a hit.
    /// Every edge within this distance adds its own intersection.
    pub pick_line_threshold: f32,
    pub grid: GridSettings,
}

impl Default for StackSettings {
    fn default() -> Self {
        Self {
            block_size: Vec3::new(1.0, 0.5, 1.0),
            base_offset: 0.25,
            step: 0.5,
            removal_duration: Duration::from_millis(1000),
            target_rotation: -PI,
            twist_step: PI / 30.0,
            face_color: materials::FACE_COLOR,
            highlight_color: materials::HIGHLIGHT_COLOR,
            outline_color: materials::OUTLINE_COLOR,
            pick_line_threshold: 1.0,
            grid: GridSettings::default(),
        }
    }
}

/// Marker for a block's parent entity.
#[derive(Component)]
pub struct BlockGroup;

/// Marker for a block's solid face mesh.
#[derive(Component)]
pub struct BlockFace;

/// Marker for a block's edge outline.
#[derive(Component)]
pub struct BlockOutline;

/// One block in the stack.
#[derive(Clone, Debug)]
pub struct StackEntry {
    pub group: Entity,
    pub outline: Entity,
    pub face: Entity,
    pub face_material: Handle<StandardMaterial>,
    pub translation: Vec3,
    /// False once the collapse has detached this block from the scene.
    pub attached: bool,
}

/// Ordered blocks, bottom to top, plus selection and collapse state.
#[derive(Resource, Default)]
pub struct BlockStack {
    entries: Vec<StackEntry>,
    top: Option<Entity>,
    selected: Option<Entity>,
    removal: Option<RemovalAnimation>,
}

impl BlockStack {
    pub fn entries(&self) -> &[StackEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Group entity of the most recently added block.
    pub fn top(&self) -> Option<Entity> {
        self.top
    }

    /// Face entity of the highlighted block.
    pub fn selected(&self) -> Option<Entity> {
        self.selected
    }

    pub fn is_animating(&self) -> bool {
        self.removal.is_some()
    }

    pub fn group_entities(&self) -> Vec<Entity> {
        self.entries.iter().map(|e| e.group).collect()
    }

    pub fn index_of_face(&self, face: Entity) -> Option<usize> {
        self.entries.iter().position(|e| e.face == face)
    }

    /// Where the next block goes: one step above the top block, or the base offset.
    pub fn next_translation(&self, settings: &StackSettings) -> Vec3 {
        let top = self
            .top
            .and_then(|group| self.entries.iter().find(|e| e.group == group));
        match top {
            Some(entry) => entry.translation + Vec3::Y * settings.step,
            None => Vec3::Y * settings.base_offset,
        }
    }

    pub fn push(&mut self, spawned: SpawnedBlock, translation: Vec3) {
        self.top = Some(spawned.group);
        self.entries.push(StackEntry {
            group: spawned.group,
            outline: spawned.outline,
            face: spawned.face,
            face_material: spawned.face_material,
            translation,
            attached: true,
        });
    }

    pub(crate) fn set_selected(&mut self, face: Option<Entity>) {
        self.selected = face;
    }

    /// Starts the collapse. Refused while one is running or when there is nothing to remove.
    pub fn begin_removal(&mut self, settings: &StackSettings) -> bool {
        if self.removal.is_some() {
            return false;
        }
        match RemovalAnimation::new(
            self.entries.len(),
            settings.removal_duration,
            settings.target_rotation,
        ) {
            Some(animation) => {
                self.removal = Some(animation);
                true
            }
            None => false,
        }
    }

    pub(crate) fn detach(&mut self, index: usize) -> Option<Entity> {
        let entry = self.entries.get_mut(index)?;
        if !entry.attached {
            return None;
        }
        entry.attached = false;
        Some(entry.group)
    }

    /// Ends the collapse: empties the stack and returns groups still attached.
    fn finish_removal(&mut self) -> Vec<Entity> {
        let remaining = self
            .entries
            .drain(..)
            .filter(|e| e.attached)
            .map(|e| e.group)
            .collect();
        self.top = None;
        self.selected = None;
        self.removal = None;
        remaining
    }
}

pub fn stack_plugin(app: &mut App) {
    app.init_resource::<StackSettings>()
        .init_resource::<BlockStack>()
        .configure_sets(
            Update,
            (FrameStage::Input, FrameStage::Stack, FrameStage::Camera).chain(),
        )
        .add_systems(Startup, setup_scene)
        // a collapse begun by this frame's commands first advances next frame
        .add_systems(
            Update,
            (drive_removal, apply_stack_commands)
                .chain()
                .in_set(FrameStage::Stack),
        );
}

pub fn setup_scene(
    mut commands: Commands,
    renderer: Res<RendererResource>,
    settings: Res<StackSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials_res: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(renderer.0.geometry(&mut meshes, &settings));
    grid::spawn_ground_grid(&mut commands, &mut meshes, &mut materials_res, &settings.grid);
}

/// Spawns a block on top of the stack. No-op while the stack is collapsing.
pub fn add_block(
    commands: &mut Commands,
    renderer: &dyn BlockRenderer,
    geometry: &BlockGeometry,
    materials_res: &mut Assets<StandardMaterial>,
    settings: &StackSettings,
    stack: &mut BlockStack,
) -> Option<Entity> {
    if stack.is_animating() {
        debug!("add_block ignored: collapse in progress");
        return None;
    }
    let translation = stack.next_translation(settings);
    let spawned = renderer.spawn_block(commands, geometry, materials_res, settings, translation);
    let group = spawned.group;
    stack.push(spawned, translation);
    debug!("block {} added at y={:.2}", stack.len() - 1, translation.y);
    Some(group)
}

/// Starts the collapse animation. No-op while one is running or the stack is empty.
pub fn clear_block(stack: &mut BlockStack, settings: &StackSettings) -> bool {
    if stack.is_animating() {
        debug!("clear_block ignored: collapse in progress");
        return false;
    }
    if !stack.begin_removal(settings) {
        debug!("clear_block ignored: stack is empty");
        return false;
    }
    info!("collapsing {} blocks", stack.len());
    true
}

pub fn apply_stack_commands(
    mut commands: Commands,
    channel: Res<StackChannel>,
    renderer: Res<RendererResource>,
    geometry: Res<BlockGeometry>,
    settings: Res<StackSettings>,
    mut materials_res: ResMut<Assets<StandardMaterial>>,
    mut stack: ResMut<BlockStack>,
) {
    for command in channel.0.try_iter() {
        match command {
            StackCommand::AddBlock => {
                add_block(
                    &mut commands,
                    renderer.0.as_ref(),
                    &geometry,
                    &mut materials_res,
                    &settings,
                    &mut stack,
                );
            }
            StackCommand::ClearBlock => {
                clear_block(&mut stack, &settings);
            }
        }
    }
}

/// Advances the collapse: twists every block, detaches on schedule, and
/// sweeps up the remainder when the twist completes.
pub fn drive_removal(
    mut commands: Commands,
    time: Res<Time>,
    settings: Res<StackSettings>,
    mut stack: ResMut<BlockStack>,
    mut groups: Query<&mut Transform, With<BlockGroup>>,
) {
    let Some(animation) = stack.removal.as_mut() else {
        return;
    };
    let step = animation.advance(time.delta());

    for (index, entry) in stack.entries.iter().enumerate() {
        if let Ok(mut transform) = groups.get_mut(entry.group) {
            transform.rotation =
                Quat::from_rotation_y(step.rotation + index as f32 * settings.twist_step);
        }
    }

    for index in step.detached {
        if let Some(group) = stack.detach(index) {
            commands.entity(group).despawn_recursive();
            debug!("block {index} detached");
        }
    }

    if step.finished {
        for group in stack.finish_removal() {
            commands.entity(group).despawn_recursive();
        }
        info!("stack cleared");
    }
}

#[cfg(test)]
mod tests {
    use bevy::math::EulerRot;

    use super::*;
    use crate::data::init_stack_channel;
    use crate::render::OutlinedCubeRenderer;
    use crate::scene::grid::GroundGrid;

    fn test_app() -> (App, crate::data::StackHandle) {
        let (handle, channel) = init_stack_channel();
        let mut app = App::new();
        app.init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .init_resource::<Time>()
            .insert_resource(channel)
            .insert_resource(RendererResource::new(OutlinedCubeRenderer))
            .add_plugins(stack_plugin);
        (app, handle)
    }

    fn advance(app: &mut App, delta: Duration) {
        app.world_mut().resource_mut::<Time>().advance_by(delta);
        app.update();
    }

    #[test]
    fn setup_scene_inserts_geometry_and_grid() {
        let (mut app, _handle) = test_app();

        app.update();

        assert!(app.world().get_resource::<BlockGeometry>().is_some());
        let world = app.world_mut();
        let grids = world.query::<&GroundGrid>().iter(world).count();
        assert_eq!(grids, 1);
    }

    #[test]
    fn blocks_stack_upwards_in_insertion_order() {
        let (mut app, handle) = test_app();
        for _ in 0..4 {
            handle.add_block();
        }

        app.update();

        let stack = app.world().resource::<BlockStack>();
        assert_eq!(stack.len(), 4);
        let heights: Vec<f32> = stack.entries().iter().map(|e| e.translation.y).collect();
        assert_eq!(heights, vec![0.25, 0.75, 1.25, 1.75]);
        assert_eq!(stack.top(), Some(stack.entries()[3].group));
    }

    #[test]
    fn clear_on_empty_stack_is_a_no_op() {
        let (mut app, handle) = test_app();
        handle.clear_block();

        app.update();

        assert!(!app.world().resource::<BlockStack>().is_animating());
    }

    #[test]
    fn commands_during_collapse_are_ignored() {
        let (mut app, handle) = test_app();
        handle.add_block();
        handle.add_block();
        app.update();

        handle.clear_block();
        handle.add_block();
        handle.clear_block();
        app.update();

        let stack = app.world().resource::<BlockStack>();
        assert!(stack.is_animating());
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn collapse_twists_blocks_by_index() {
        let (mut app, handle) = test_app();
        handle.add_block();
        handle.add_block();
        app.update();
        handle.clear_block();
        app.update();

        advance(&mut app, Duration::from_millis(100));

        let stack = app.world().resource::<BlockStack>();
        let groups = stack.group_entities();
        let bottom = app.world().get::<Transform>(groups[0]).unwrap().rotation;
        let upper = app.world().get::<Transform>(groups[1]).unwrap().rotation;
        let twist = bottom.inverse() * upper;
        assert!((twist.to_euler(EulerRot::YXZ).0 - PI / 30.0).abs() < 1e-4);
    }

    #[test]
    fn collapse_starts_on_the_frame_it_is_requested() {
        let (mut app, handle) = test_app();
        handle.add_block();
        handle.add_block();
        app.update();

        // a long frame delivers the clear; none of it counts towards the collapse
        handle.clear_block();
        advance(&mut app, Duration::from_millis(900));

        let stack = app.world().resource::<BlockStack>();
        assert!(stack.is_animating());
        assert!(stack.entries().iter().all(|e| e.attached));
        for group in stack.group_entities() {
            let rotation = app.world().get::<Transform>(group).unwrap().rotation;
            assert_eq!(rotation, Quat::IDENTITY);
        }

        advance(&mut app, Duration::from_millis(100));

        let stack = app.world().resource::<BlockStack>();
        assert!(stack.entries().iter().all(|e| e.attached));
        let bottom = stack.entries()[0].group;
        let rotation = app.world().get::<Transform>(bottom).unwrap().rotation;
        assert_ne!(rotation, Quat::IDENTITY);
    }

    #[test]
    fn selection_is_dropped_when_collapse_finishes() {
        let (mut app, handle) = test_app();
        handle.add_block();
        app.update();
        {
            let mut stack = app.world_mut().resource_mut::<BlockStack>();
            let face = stack.entries()[0].face;
            stack.set_selected(Some(face));
        }
        handle.clear_block();
        app.update();

        advance(&mut app, Duration::from_millis(1000));

        let stack = app.world().resource::<BlockStack>();
        assert!(stack.is_empty());
        assert_eq!(stack.selected(), None);
        assert_eq!(stack.top(), None);
    }
}
