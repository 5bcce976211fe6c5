//! Cairn — an interactive stack of cube blocks. Runs the block_stack app.

use bevy::prelude::*;
use block_stack::data::{load_script, spawn_script_player};
use block_stack::prelude::*;

fn main() {
    let _ = dotenvy::dotenv();
    let config = stack_config();
    let script = config.script.clone();

    let (mut app, handle) = BlockStackBuilder::new()
        .config(config)
        .on_click_block(|click| {
            info!(
                "clicked cube {:?}: selected={} hit={} of {} blocks",
                click.cube,
                click.selected,
                click.index,
                click.cubes.len()
            );
        })
        .build();

    if let Some(path) = script {
        match load_script(&path) {
            Ok(steps) => {
                spawn_script_player(handle, steps);
            }
            Err(err) => eprintln!("cairn: {err:#}"),
        }
    }

    app.run();
}
