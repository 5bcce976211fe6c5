mod channel;
mod model;

pub use channel::{
    init_stack_channel, load_script, parse_script, spawn_script_player, StackChannel, StackHandle,
};
pub use model::{BlockClick, ClickHandler, ScriptStep, StackCommand};
