//! Click picking: ray from the camera through the pointer, nearest-first
//! intersections against every block, selection toggling.
//!
//! Uses manual ray-box and ray-edge tests rather than Bevy's mesh picking so
//! outline hits can be ordered alongside face hits.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::data::{BlockClick, ClickHandler};
use crate::render::box_edges;
use crate::scene::blocks::{BlockGroup, BlockStack, FrameStage, StackSettings};
use crate::scene::materials;

/// Set by the overlay when the pointer is over UI; input systems skip the frame.
#[derive(Resource, Default)]
pub struct PointerCapture {
    pub over_ui: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickRay {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitKind {
    Outline,
    Face,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    pub distance: f32,
    pub stack_index: usize,
    /// The outline or face entity that was hit.
    pub entity: Entity,
    pub kind: HitKind,
}

pub fn picking_plugin(app: &mut App) {
    app.init_resource::<PointerCapture>()
        .init_resource::<ClickHandler>()
        .add_systems(Update, click_pick_system.in_set(FrameStage::Input));
}

/// Window coordinates (origin top-left, y down) to normalized device
/// coordinates in `[-1, 1]` with y up.
pub fn pointer_to_ndc(cursor: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(
        (cursor.x / viewport.x) * 2.0 - 1.0,
        -(cursor.y / viewport.y) * 2.0 + 1.0,
    )
}

/// Unprojects straight from NDC. `Camera::viewport_to_world` would need the
/// render target size, which only the render camera system fills in; the
/// window size already went into `pointer_to_ndc`.
pub fn ray_from_ndc(
    camera: &Camera,
    camera_transform: &GlobalTransform,
    ndc: Vec2,
) -> Option<PickRay> {
    // reversed-z: 1.0 is the near plane
    let near = camera.ndc_to_world(camera_transform, ndc.extend(1.0))?;
    let far = camera.ndc_to_world(camera_transform, ndc.extend(f32::EPSILON))?;
    let direction = (far - near).try_normalize()?;
    Some(PickRay {
        origin: near,
        direction,
    })
}

/// Intersects `ray` with every attached block, sorted nearest first.
///
/// Each outline edge passing within `pick_line_threshold` of the ray is its
/// own hit, so a face is usually preceded by several outline hits.
pub fn intersect_stack(
    ray: &PickRay,
    stack: &BlockStack,
    transform_of: impl Fn(Entity) -> Option<GlobalTransform>,
    settings: &StackSettings,
) -> Vec<Intersection> {
    let half = settings.block_size / 2.0;
    let edges = box_edges(half);
    let mut hits = Vec::new();

    for (stack_index, entry) in stack.entries().iter().enumerate() {
        if !entry.attached {
            continue;
        }
        let Some(transform) = transform_of(entry.group) else {
            continue;
        };
        let to_local = transform.affine().inverse();
        let origin = to_local.transform_point3(ray.origin);
        let direction = to_local.transform_vector3(ray.direction);

        // outline edges go in ahead of the face so equal distances keep that order
        for &(a, b) in &edges {
            let (distance, gap) = ray_segment_closest(origin, direction, a, b);
            if gap <= settings.pick_line_threshold {
                hits.push(Intersection {
                    distance,
                    stack_index,
                    entity: entry.outline,
                    kind: HitKind::Outline,
                });
            }
        }

        if let Some(distance) = ray_aabb_intersect(origin, direction, -half, half) {
            hits.push(Intersection {
                distance,
                stack_index,
                entity: entry.face,
                kind: HitKind::Face,
            });
        }
    }

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

fn ray_aabb_intersect(origin: Vec3, dir: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Option<f32> {
    let inv_dir = 1.0 / dir;
    let t1 = (aabb_min - origin) * inv_dir;
    let t2 = (aabb_max - origin) * inv_dir;
    let t_min = t1.min(t2);
    let t_max = t1.max(t2);
    let t_enter = t_min.x.max(t_min.y).max(t_min.z);
    let t_exit = t_max.x.min(t_max.y).min(t_max.z);
    if t_enter <= t_exit && t_exit > 0.0 {
        Some(t_enter.max(0.0))
    } else {
        None
    }
}

/// Closest approach between a ray and segment `a..b`.
/// Returns the distance along the ray and the gap between the two.
fn ray_segment_closest(origin: Vec3, dir: Vec3, a: Vec3, b: Vec3) -> (f32, f32) {
    let seg = b - a;
    let w = origin - a;
    let dd = dir.dot(dir);
    let ds = dir.dot(seg);
    let ss = seg.dot(seg);
    let dw = dir.dot(w);
    let sw = seg.dot(w);

    let denom = dd * ss - ds * ds;
    let seg_t = if denom > f32::EPSILON {
        ((dd * sw - ds * dw) / denom).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let ray_t = ((seg_t * ds - dw) / dd).max(0.0);
    let seg_t = ((w + dir * ray_t).dot(seg) / ss).clamp(0.0, 1.0);

    let on_ray = origin + dir * ray_t;
    let on_seg = a + seg * seg_t;
    (ray_t, on_ray.distance(on_seg))
}

/// Applies a click to the stack: resets every face to the default color, then
/// toggles the nearest face hit. Returns `None` when no face was hit.
pub fn select_face(
    stack: &mut BlockStack,
    materials_res: &mut Assets<StandardMaterial>,
    settings: &StackSettings,
    intersections: &[Intersection],
) -> Option<BlockClick> {
    let (index, hit) = intersections
        .iter()
        .enumerate()
        .find(|(_, hit)| hit.kind == HitKind::Face)?;

    for entry in stack.entries() {
        materials::set_base_color(materials_res, &entry.face_material, settings.face_color);
    }

    let selected = stack.selected() != Some(hit.entity);
    if selected {
        let entry = &stack.entries()[hit.stack_index];
        materials::set_base_color(materials_res, &entry.face_material, settings.highlight_color);
        stack.set_selected(Some(hit.entity));
    } else {
        stack.set_selected(None);
    }

    Some(BlockClick {
        index,
        selected,
        cube: hit.entity,
        cubes: stack.group_entities(),
    })
}

#[allow(clippy::too_many_arguments)]
pub fn click_pick_system(
    mouse: Res<ButtonInput<MouseButton>>,
    capture: Res<PointerCapture>,
    handler: Res<ClickHandler>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    groups: Query<&GlobalTransform, With<BlockGroup>>,
    settings: Res<StackSettings>,
    mut stack: ResMut<BlockStack>,
    mut materials_res: ResMut<Assets<StandardMaterial>>,
) {
    if !mouse.just_pressed(MouseButton::Left) || capture.over_ui {
        return;
    }
    if !handler.is_registered() {
        return;
    }

    let Ok(window) = windows.get_single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.get_single() else {
        return;
    };
    let ndc = pointer_to_ndc(cursor, window.size());
    let Some(ray) = ray_from_ndc(camera, camera_transform, ndc) else {
        return;
    };

    let hits = intersect_stack(&ray, &stack, |e| groups.get(e).ok().copied(), &settings);
    let Some(click) = select_face(&mut stack, &mut materials_res, &settings, &hits) else {
        return;
    };

    info!(
        "block {:?} {} (hit #{})",
        stack.index_of_face(click.cube),
        if click.selected { "selected" } else { "deselected" },
        click.index
    );
    handler.notify(&click);
}
