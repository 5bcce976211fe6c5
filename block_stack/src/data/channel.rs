use std::path::Path;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Context;
use crossbeam_channel::{Receiver, Sender};

use crate::data::model::{ScriptStep, StackCommand};

/// Bevy resource holding the receiving end of the command channel.
/// Drained once per frame by `apply_stack_commands`.
#[derive(bevy::prelude::Resource)]
pub struct StackChannel(pub Receiver<StackCommand>);

/// Caller-side handle to the stack. Cheap to clone and usable from any thread.
#[derive(bevy::prelude::Resource, Clone)]
pub struct StackHandle(Sender<StackCommand>);

impl StackHandle {
    pub fn add_block(&self) {
        self.send(StackCommand::AddBlock);
    }

    pub fn clear_block(&self) {
        self.send(StackCommand::ClearBlock);
    }

    pub fn send(&self, command: StackCommand) {
        if self.0.send(command).is_err() {
            bevy::log::debug!("stack channel closed, dropping {command:?}");
        }
    }
}

/// Create the command channel shared by the app and its callers.
pub fn init_stack_channel() -> (StackHandle, StackChannel) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (StackHandle(tx), StackChannel(rx))
}

/// Parse a JSON command script: an array of `{ "command": ..., "delay_ms": ... }`.
pub fn parse_script(json: &str) -> anyhow::Result<Vec<ScriptStep>> {
    serde_json::from_str(json).context("invalid stack script")
}

/// Read and parse a command script from disk.
pub fn load_script(path: &Path) -> anyhow::Result<Vec<ScriptStep>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read stack script {}", path.display()))?;
    parse_script(&json).with_context(|| format!("in {}", path.display()))
}

/// Replay scripted commands on a dedicated thread, sleeping before each step.
/// Stops early once the app side of the channel is gone.
pub fn spawn_script_player(handle: StackHandle, steps: Vec<ScriptStep>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for step in steps {
            std::thread::sleep(Duration::from_millis(step.delay_ms));
            if handle.0.send(step.command).is_err() {
                return;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_commands_arrive_in_order() {
        let (handle, channel) = init_stack_channel();

        handle.add_block();
        handle.clone().add_block();
        handle.clear_block();

        let received: Vec<_> = channel.0.try_iter().collect();
        assert_eq!(
            received,
            vec![
                StackCommand::AddBlock,
                StackCommand::AddBlock,
                StackCommand::ClearBlock
            ]
        );
    }

    #[test]
    fn sending_after_app_shutdown_is_ignored() {
        let (handle, channel) = init_stack_channel();
        drop(channel);

        handle.add_block();
    }

    #[test]
    fn script_parses_snake_case_commands_with_default_delay() {
        let steps = parse_script(
            r#"[
                { "command": "add_block" },
                { "command": "clear_block", "delay_ms": 250 }
            ]"#,
        )
        .unwrap();

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].command, StackCommand::AddBlock);
        assert_eq!(steps[0].delay_ms, 0);
        assert_eq!(steps[1].command, StackCommand::ClearBlock);
        assert_eq!(steps[1].delay_ms, 250);
    }

    #[test]
    fn unknown_command_is_an_error() {
        let err = parse_script(r#"[{ "command": "explode" }]"#).unwrap_err();
        assert!(format!("{err:#}").contains("invalid stack script"));
    }

    #[test]
    fn missing_script_reports_path() {
        let err = load_script(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.json"));
    }

    #[test]
    fn script_player_forwards_every_step() {
        let (handle, channel) = init_stack_channel();
        let steps = vec![
            ScriptStep {
                command: StackCommand::AddBlock,
                delay_ms: 0,
            },
            ScriptStep {
                command: StackCommand::ClearBlock,
                delay_ms: 1,
            },
        ];

        spawn_script_player(handle, steps).join().unwrap();

        let received: Vec<_> = channel.0.try_iter().collect();
        assert_eq!(received, vec![StackCommand::AddBlock, StackCommand::ClearBlock]);
    }
}
