//! Environment-driven configuration and defaults.

use std::path::PathBuf;

const DEFAULT_ROTATION_SPEED: f32 = 0.001;

/// Startup options read from the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct StackConfig {
    pub auto_rotate: bool,
    /// Radians per frame.
    pub camera_rotation_speed: f32,
    /// Optional JSON command script to replay.
    pub script: Option<PathBuf>,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            auto_rotate: false,
            camera_rotation_speed: DEFAULT_ROTATION_SPEED,
            script: None,
        }
    }
}

/// Reads `AUTO_ROTATE`, `CAMERA_ROTATION_SPEED` and `STACK_SCRIPT`.
/// Unparseable values are reported and replaced by their defaults.
pub fn stack_config() -> StackConfig {
    let defaults = StackConfig::default();

    let auto_rotate = match std::env::var("AUTO_ROTATE") {
        Ok(raw) => parse_flag(&raw).unwrap_or_else(|| {
            eprintln!("cairn: invalid AUTO_ROTATE {raw:?}, expected true/false");
            defaults.auto_rotate
        }),
        Err(_) => defaults.auto_rotate,
    };

    let camera_rotation_speed = match std::env::var("CAMERA_ROTATION_SPEED") {
        Ok(raw) => match raw.trim().parse::<f32>() {
            Ok(speed) if speed.is_finite() => speed,
            _ => {
                eprintln!("cairn: invalid CAMERA_ROTATION_SPEED {raw:?}");
                defaults.camera_rotation_speed
            }
        },
        Err(_) => defaults.camera_rotation_speed,
    };

    let script = std::env::var("STACK_SCRIPT")
        .ok()
        .filter(|raw| !raw.trim().is_empty())
        .map(PathBuf::from);

    StackConfig {
        auto_rotate,
        camera_rotation_speed,
        script,
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
