//! Command handling: parse an invocation, call the commerce API, answer.

mod command;
mod dispatcher;
mod ports;

pub use command::{
    ArgValue, Command, CommandRequest, CommandSpec, OptionKind, OptionSpec, COMMANDS,
};
pub use dispatcher::{DispatchSettings, Dispatcher};
pub use ports::{GuildRoles, Interaction};
