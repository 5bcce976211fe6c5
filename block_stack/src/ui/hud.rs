//! HUD overlay: stack stats, selection, FPS, add/clear controls.

use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPlugin};

use crate::camera::AutoRotate;
use crate::data::StackHandle;
use crate::scene::{BlockStack, FrameStage, PointerCapture};

pub fn hud_plugin(app: &mut App) {
    app.add_plugins(EguiPlugin)
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .init_resource::<PointerCapture>()
        .add_systems(
            Update,
            (hud_overlay_system, hotkey_system).before(FrameStage::Input),
        );
}

fn hud_overlay_system(
    mut contexts: EguiContexts,
    stack: Res<BlockStack>,
    handle: Res<StackHandle>,
    diagnostics: Res<DiagnosticsStore>,
    mut auto_rotate: Option<ResMut<AutoRotate>>,
    mut capture: ResMut<PointerCapture>,
) {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|d| d.smoothed())
        .unwrap_or(0.0);

    let ctx = contexts.ctx_mut();
    egui::Window::new("Block Stack")
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .resizable(false)
        .collapsible(false)
        .title_bar(false)
        .frame(
            egui::Frame::default()
                .fill(egui::Color32::from_rgba_premultiplied(15, 15, 25, 210))
                .inner_margin(egui::Margin::same(12))
                .corner_radius(egui::CornerRadius::same(6)),
        )
        .show(ctx, |ui| {
            ui.style_mut().override_text_style = Some(egui::TextStyle::Monospace);
            ui.visuals_mut().override_text_color = Some(egui::Color32::from_rgb(200, 220, 240));

            ui.label(
                egui::RichText::new(format!("Blocks {}", stack.len()))
                    .size(16.0)
                    .color(egui::Color32::from_rgb(100, 220, 180)),
            );
            ui.add_space(4.0);

            ui.label(format!("State     {}", stack_state(&stack)));
            ui.label(format!("Selected  {}", selection_label(&stack)));
            ui.add_space(4.0);

            ui.add_enabled_ui(!stack.is_animating(), |ui| {
                ui.horizontal(|ui| {
                    if ui.button("Add block").clicked() {
                        handle.add_block();
                    }
                    if ui.button("Clear blocks").clicked() {
                        handle.clear_block();
                    }
                });
            });

            if let Some(rig) = auto_rotate.as_mut() {
                ui.checkbox(&mut rig.enabled, "Auto-rotate");
            }
            ui.add_space(4.0);

            ui.separator();
            ui.label(format!("FPS  {fps:.0}"));
            ui.label(
                egui::RichText::new("A add · C clear · drag to orbit")
                    .size(11.0)
                    .color(egui::Color32::from_rgb(120, 120, 140)),
            );
        });

    capture.over_ui = ctx.is_pointer_over_area() || ctx.wants_pointer_input();
}

fn hotkey_system(keys: Res<ButtonInput<KeyCode>>, handle: Res<StackHandle>) {
    if keys.just_pressed(KeyCode::KeyA) {
        handle.add_block();
    }
    if keys.just_pressed(KeyCode::KeyC) {
        handle.clear_block();
    }
}

fn stack_state(stack: &BlockStack) -> &'static str {
    if stack.is_animating() {
        "collapsing"
    } else if stack.is_empty() {
        "empty"
    } else {
        "idle"
    }
}

fn selection_label(stack: &BlockStack) -> String {
    stack
        .selected()
        .and_then(|face| stack.index_of_face(face))
        .map_or_else(|| "none".to_string(), |index| format!("#{index}"))
}
