use std::time::Duration;

use bevy::prelude::*;
use block_stack::data::{init_stack_channel, StackHandle};
use block_stack::render::{OutlinedCubeRenderer, RendererResource};
use block_stack::{stack_plugin, BlockGroup, BlockStack};

fn headless_app() -> (App, StackHandle) {
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

fn step(app: &mut App, delta: Duration) {
    app.world_mut().resource_mut::<Time>().advance_by(delta);
    app.update();
}

fn live_groups(app: &mut App) -> usize {
    let world = app.world_mut();
    world.query::<&BlockGroup>().iter(world).count()
}

fn attached(app: &App) -> Vec<bool> {
    app.world()
        .resource::<BlockStack>()
        .entries()
        .iter()
        .map(|e| e.attached)
        .collect()
}

#[test]
fn heights_increase_with_every_add() {
    let (mut app, handle) = headless_app();

    for expected in 1..=6 {
        handle.add_block();
        app.update();
        assert_eq!(app.world().resource::<BlockStack>().len(), expected);
    }

    let stack = app.world().resource::<BlockStack>();
    let heights: Vec<f32> = stack.entries().iter().map(|e| e.translation.y).collect();
    assert!(heights.windows(2).all(|w| w[1] > w[0]));
    assert_eq!(live_groups(&mut app), 6);
}

#[test]
fn three_block_collapse_removes_top_down_then_releases_guard() {
    let (mut app, handle) = headless_app();
    for _ in 0..3 {
        handle.add_block();
    }
    app.update();

    handle.clear_block();
    app.update();
    assert!(app.world().resource::<BlockStack>().is_animating());

    let period = Duration::from_millis(1000) / 3;

    step(&mut app, period);
    assert_eq!(attached(&app), vec![true, true, false]);
    assert_eq!(live_groups(&mut app), 2);

    handle.add_block();
    step(&mut app, period);
    assert_eq!(attached(&app), vec![true, false, false]);
    assert_eq!(app.world().resource::<BlockStack>().len(), 3);

    step(&mut app, period);
    assert_eq!(attached(&app), vec![false, false, false]);
    assert_eq!(live_groups(&mut app), 0);

    step(&mut app, Duration::from_millis(1000) - period * 3);
    let stack = app.world().resource::<BlockStack>();
    assert!(!stack.is_animating());
    assert!(stack.is_empty());
    assert_eq!(stack.top(), None);

    handle.add_block();
    app.update();
    let stack = app.world().resource::<BlockStack>();
    assert_eq!(stack.len(), 1);
    assert_eq!(stack.entries()[0].translation.y, 0.25);
}

#[test]
fn slow_frames_still_finish_the_collapse() {
    let (mut app, handle) = headless_app();
    for _ in 0..5 {
        handle.add_block();
    }
    app.update();
    handle.clear_block();
    app.update();

    step(&mut app, Duration::from_millis(1500));

    assert!(app.world().resource::<BlockStack>().is_empty());
    assert_eq!(live_groups(&mut app), 0);
}

#[test]
fn clear_during_collapse_does_not_restart_it() {
    let (mut app, handle) = headless_app();
    handle.add_block();
    handle.add_block();
    app.update();
    handle.clear_block();
    app.update();

    step(&mut app, Duration::from_millis(600));
    handle.clear_block();
    step(&mut app, Duration::from_millis(400));

    let stack = app.world().resource::<BlockStack>();
    assert!(!stack.is_animating());
    assert!(stack.is_empty());
}
