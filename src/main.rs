mod console;

use anyhow::{Context, Result, anyhow};
use backtrace::Backtrace;
use clap::Parser;
use jabbot_core::commands::{CommandBuilder, RegistrationError};
use jabbot_core::{Agent, AgentMessage, BotConfig};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

#[derive(Parser)]
#[command(version, about = "Runs a chat command bot on the console")]
struct Args {
    /// Config file, created with default values if missing
    #[arg(short, long, default_value = "Config.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    // Setup logging
    let logfile = tracing_appender::rolling::daily("./logs", "jabbot.log");
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("JABBOT_LOG")
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_writer(logfile.and(std::io::stderr))
        .with_env_filter(env_filter)
        .init();

    std::panic::set_hook(Box::new(|panic_info| {
        let backtrace = Backtrace::new();
        error!("{}\n{:?}", panic_info, backtrace);
    }));

    let args = Args::parse();
    let config = BotConfig::load(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;

    let agent = Agent::new(config, Arc::new(console::ConsoleTransport))?;
    register_demo_commands(&agent)?;

    let handle = agent.spawn().context("Failed to start the listener thread")?;

    let shutdown = handle.sender();
    ctrlc::set_handler(move || {
        let _ = shutdown.send(AgentMessage::Shutdown);
    })
    .context("Failed to install the Ctrl-C handler")?;

    // Stdin is read on its own thread so Ctrl-C can stop the agent while a read blocks
    let inbound = handle.sender();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!("Failed to read stdin: {}", err);
                    break;
                }
            };
            let Some(message) = console::parse_line(&line) else {
                warn!("Expected `<sender>: <message>`, got {:?}", line);
                continue;
            };
            if inbound.send(AgentMessage::Inbound(message)).is_err() {
                return;
            }
        }
        let _ = inbound.send(AgentMessage::Shutdown);
    });

    handle
        .join()
        .map_err(|_| anyhow!("The listener thread panicked"))
}

fn register_demo_commands(agent: &Agent) -> Result<(), RegistrationError> {
    agent.add_command(
        CommandBuilder::new("add <a> <b>", r"^add\s+(-?\d+)\s+(-?\d+)$")
            .description("Adds two integers")
            .public()
            .alias("sum <a> <b>", r"^sum\s+(-?\d+)\s+(-?\d+)$")
            .executes(|ctx| {
                let a = ctx.params().parse::<i64>(0)?;
                let b = ctx.params().parse::<i64>(1)?;
                Ok(Some((a + b).to_string()))
            }),
    )?;

    agent.add_command(
        CommandBuilder::new("echo <message>", r"^echo\s+(.+)$")
            .description("Repeats the message back")
            .public()
            .executes(|ctx| Ok(ctx.params().single().map(str::to_string))),
    )?;

    agent.add_command(
        CommandBuilder::new("whoami", r"^whoami$")
            .description("Tells you who you are to this bot")
            .executes(|ctx| {
                let role = if ctx.is_master() { "a master" } else { "a guest" };
                Ok(Some(format!("You are {}, {}", ctx.sender(), role)))
            }),
    )
}
