//! SDK entry point: builder that assembles the block stack app.

use bevy::prelude::*;

use crate::camera::{orbit_camera_plugin, AutoRotate};
use crate::config::StackConfig;
use crate::data::{init_stack_channel, BlockClick, ClickHandler, StackHandle};
use crate::render::{BlockRenderer, OutlinedCubeRenderer, RendererResource};
use crate::scene::{picking_plugin, stack_plugin, StackSettings};
use crate::ui::hud_plugin;

/// Builder for the block stack app. `build` returns the app together with the
/// handle used to add and clear blocks.
pub struct BlockStackBuilder {
    config: StackConfig,
    settings: StackSettings,
    click_handler: Option<ClickHandler>,
    renderer: Option<Box<dyn BlockRenderer>>,
    window_title: String,
    window_resolution: (f32, f32),
    clear_color: Color,
    enable_hud: bool,
}

impl Default for BlockStackBuilder {
    fn default() -> Self {
        Self {
            config: StackConfig::default(),
            settings: StackSettings::default(),
            click_handler: None,
            renderer: None,
            window_title: "Cairn".to_string(),
            window_resolution: (1280.0, 720.0),
            clear_color: Color::BLACK,
            enable_hud: true,
        }
    }
}

impl BlockStackBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take auto-rotation options from a loaded [`StackConfig`].
    pub fn config(mut self, config: StackConfig) -> Self {
        self.config = config;
        self
    }

    /// Load options from environment variables.
    pub fn stack_config(mut self) -> Self {
        self.config = crate::config::stack_config();
        self
    }

    /// Called whenever a block face is clicked. Without a callback, clicks are ignored.
    pub fn on_click_block(
        mut self,
        callback: impl Fn(&BlockClick) + Send + Sync + 'static,
    ) -> Self {
        self.click_handler = Some(ClickHandler::new(callback));
        self
    }

    pub fn auto_rotate(mut self, enabled: bool) -> Self {
        self.config.auto_rotate = enabled;
        self
    }

    /// Radians per frame while auto-rotating.
    pub fn camera_rotation_speed(mut self, speed: f32) -> Self {
        self.config.camera_rotation_speed = speed;
        self
    }

    pub fn settings(mut self, settings: StackSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Provide a custom block renderer implementation.
    pub fn renderer(mut self, renderer: impl BlockRenderer) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    pub fn window_resolution(mut self, width: f32, height: f32) -> Self {
        self.window_resolution = (width, height);
        self
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn disable_hud(mut self) -> Self {
        self.enable_hud = false;
        self
    }

    /// Build the Bevy app with the selected configuration and plugins.
    pub fn build(self) -> (App, StackHandle) {
        let (handle, channel) = init_stack_channel();
        let renderer = self
            .renderer
            .unwrap_or_else(|| Box::new(OutlinedCubeRenderer));

        let mut app = App::new();
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: self.window_title,
                resolution: self.window_resolution.into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(self.clear_color))
        .insert_resource(channel)
        .insert_resource(handle.clone())
        .insert_resource(self.settings)
        .insert_resource(self.click_handler.unwrap_or_default())
        .insert_resource(AutoRotate {
            enabled: self.config.auto_rotate,
            speed: self.config.camera_rotation_speed,
            ..default()
        });

        renderer.setup(&mut app);
        app.insert_resource(RendererResource(renderer));

        app.add_plugins((stack_plugin, orbit_camera_plugin, picking_plugin));
        if self.enable_hud {
            app.add_plugins(hud_plugin);
        }

        info!(
            "block stack ready (auto-rotate: {}, speed: {})",
            self.config.auto_rotate, self.config.camera_rotation_speed
        );
        (app, handle)
    }
}
