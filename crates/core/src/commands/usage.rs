use super::command::Command;

/// Every syntax form on its own line, then the indented description and a
/// trailing blank line.
pub(super) fn help_lines(command: &Command) -> Vec<String> {
    let mut lines: Vec<String> = command.syntax().to_vec();
    lines.push(format!("  {}", command.description()));
    lines.push(String::new());
    lines
}

pub(super) fn listing_header() -> &'static str {
    "I understand the following commands:"
}

pub(super) fn unknown_topic(topic: &str) -> String {
    format!("I don't understand '{topic}'. Try saying 'help' to see what commands I understand.")
}

pub(super) fn misunderstood(message: &str) -> String {
    format!(
        "Huh? I don't understand '{message}'. Try saying 'help' to see what commands I understand."
    )
}
