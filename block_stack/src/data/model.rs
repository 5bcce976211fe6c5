//! Commands that drive the stack and the payload handed to click callbacks.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// One request against the block stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackCommand {
    AddBlock,
    ClearBlock,
}

/// A scripted command and how long to wait before sending it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub command: StackCommand,
    #[serde(default)]
    pub delay_ms: u64,
}

/// Reported to the click callback whenever a block face is picked.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockClick {
    /// Position of the face hit within the nearest-first intersection list.
    pub index: usize,
    pub selected: bool,
    /// The solid face entity that was hit.
    pub cube: Entity,
    /// Group entities of every block in the stack, bottom to top.
    pub cubes: Vec<Entity>,
}

type ClickCallback = Box<dyn Fn(&BlockClick) + Send + Sync>;

/// Optional caller-supplied click callback.
#[derive(Resource, Default)]
pub struct ClickHandler(Option<ClickCallback>);

impl ClickHandler {
    pub fn new(callback: impl Fn(&BlockClick) + Send + Sync + 'static) -> Self {
        Self(Some(Box::new(callback)))
    }

    pub fn is_registered(&self) -> bool {
        self.0.is_some()
    }

    pub fn notify(&self, click: &BlockClick) {
        if let Some(callback) = &self.0 {
            callback(click);
        }
    }
}
