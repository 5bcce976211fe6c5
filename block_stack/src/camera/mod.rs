mod orbit;

pub use orbit::{
    auto_rotate_camera, orbit_camera_plugin, orbit_input_system, orbit_update_system,
    spawn_camera, sync_aspect_on_resize, AutoRotate, OrbitController,
};
