use crate::commands::{
    command::CommandBuilder,
    context::ExecutionContext,
    error::{CommandResult, RegistrationError},
    registry::CommandRegistry,
    usage,
};

pub fn register_commands(
    registry: &mut CommandRegistry,
    agent_is_public: bool,
) -> Result<(), RegistrationError> {
    register_help(registry, agent_is_public)
}

fn register_help(
    registry: &mut CommandRegistry,
    agent_is_public: bool,
) -> Result<(), RegistrationError> {
    fn exec_help_command(ctx: &ExecutionContext<'_>) -> CommandResult<Option<String>> {
        let topic = ctx.params().single().unwrap_or_default().trim();
        let registry = ctx.registry();

        if topic.is_empty() {
            let mut lines = vec![usage::listing_header().to_string(), String::new()];
            let visible = registry
                .by_name_sorted()
                .filter(|command| !command.is_alias())
                .filter(|command| ctx.authorizer().authorized(ctx.sender(), command));
            for command in visible {
                lines.extend(usage::help_lines(command));
            }
            return Ok(Some(lines.join("\n")));
        }

        let reply = match registry.named(topic) {
            Some(command) => command.help_text(),
            None => usage::unknown_topic(topic),
        };
        Ok(Some(reply))
    }

    registry.register(
        CommandBuilder::new("help [<command>]", r"^help(\s+.+)?$")
            .description(
                "Display help for the given command, or all commands if no command is specified",
            )
            .set_public(agent_is_public)
            .alias("? [<command>]", r"^\?(\s+.+)?$")
            .executes(exec_help_command),
    )
}
