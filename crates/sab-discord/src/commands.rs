//! Slash-command registration and option decoding.

use serenity::{
    builder::{CreateCommand, CreateCommandOption},
    model::application::{CommandDataOptionValue, CommandInteraction, CommandOptionType},
};
use tracing::debug;

use sab_core::dispatch::{ArgValue, CommandRequest, CommandSpec, OptionKind, COMMANDS};

use crate::MANAGE_PERMISSION;

/// Every command, ready for `Command::set_global_commands`.
pub fn registrations() -> Vec<CreateCommand> {
    COMMANDS.iter().map(create_command).collect()
}

fn create_command(spec: &CommandSpec) -> CreateCommand {
    let mut cmd = CreateCommand::new(spec.name).description(spec.description);
    if spec.manage {
        // Hidden from members without the permission; the dispatcher still checks.
        cmd = cmd.default_member_permissions(MANAGE_PERMISSION);
    }
    spec.options.iter().fold(cmd, |cmd, opt| {
        cmd.add_option(
            CreateCommandOption::new(option_type(opt.kind), opt.name, opt.description)
                .required(opt.required),
        )
    })
}

fn option_type(kind: OptionKind) -> CommandOptionType {
    match kind {
        OptionKind::String => CommandOptionType::String,
        OptionKind::Integer => CommandOptionType::Integer,
        OptionKind::Number => CommandOptionType::Number,
        OptionKind::Boolean => CommandOptionType::Boolean,
    }
}

pub fn to_request(command: &CommandInteraction) -> CommandRequest {
    request_from_options(
        &command.data.name,
        command
            .data
            .options
            .iter()
            .map(|o| (o.name.as_str(), &o.value)),
    )
}

fn request_from_options<'a>(
    name: &str,
    options: impl IntoIterator<Item = (&'a str, &'a CommandDataOptionValue)>,
) -> CommandRequest {
    options
        .into_iter()
        .fold(CommandRequest::new(name), |req, (key, value)| {
            match arg_value(value) {
                Some(v) => req.arg(key, v),
                None => {
                    debug!(command = name, option = key, "ignoring unsupported option type");
                    req
                }
            }
        })
}

fn arg_value(value: &CommandDataOptionValue) -> Option<ArgValue> {
    match value {
        CommandDataOptionValue::String(s) => Some(ArgValue::String(s.clone())),
        CommandDataOptionValue::Integer(n) => Some(ArgValue::Integer(*n)),
        CommandDataOptionValue::Number(x) => Some(ArgValue::Number(*x)),
        CommandDataOptionValue::Boolean(b) => Some(ArgValue::Boolean(*b)),
        _ => None,
    }
}
