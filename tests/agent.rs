mod common;

use common::*;
use jabbot_core::commands::CommandBuilder;
use jabbot_core::config::Masters;
use jabbot_core::transport::{ChannelTransport, OutboundMessage, Presence, Show};
use jabbot_core::{Agent, AgentMessage};
use std::sync::Arc;

fn outbound(recipient: &str, text: &str) -> OutboundMessage {
    OutboundMessage {
        recipient: recipient.to_string(),
        text: text.to_string(),
    }
}

#[test]
fn listener_announces_dispatches_and_signs_off() {
    let (transport, outbox, _) = ChannelTransport::new();
    let mut config = config(false);
    config.name = "calc".to_string();
    let agent = Agent::new(config, Arc::new(transport)).unwrap();
    agent.add_command(add_command()).unwrap();

    let handle = agent.spawn().unwrap();
    assert!(handle.send_message(MASTER, "add 2 3"));
    assert!(handle.send_message(GUEST, "add 2 3"));
    handle.shutdown().unwrap();

    let sent: Vec<_> = outbox.try_iter().collect();
    assert_eq!(
        sent,
        [
            outbound(MASTER, "calc reporting for duty."),
            outbound(MASTER, "5"),
            outbound(MASTER, "calc disconnecting..."),
        ]
    );
}

#[test]
fn announcements_go_to_every_master() {
    let (transport, outbox, _) = ChannelTransport::new();
    let mut config = config(false);
    config.master = Masters::Many(vec!["a@example.org".to_string(), "b@example.org".to_string()]);
    let agent = Agent::new(config, Arc::new(transport)).unwrap();
    assert!(agent.is_master("b@example.org"));
    assert!(!agent.is_master(GUEST));

    agent.spawn().unwrap().shutdown().unwrap();

    let recipients: Vec<_> = outbox.try_iter().map(|m| m.recipient).collect();
    assert_eq!(
        recipients,
        ["a@example.org", "b@example.org", "a@example.org", "b@example.org"]
    );
}

#[test]
fn configured_presence_is_applied_on_start() {
    let (transport, _outbox, presence) = ChannelTransport::new();
    let mut config = config(false);
    let busy = Presence {
        show: Show::Dnd,
        status: Some("Crunching numbers".to_string()),
        priority: Some(1),
    };
    config.presence = Some(busy.clone());

    let agent = Agent::new(config, Arc::new(transport)).unwrap();
    agent.spawn().unwrap().shutdown().unwrap();

    assert_eq!(presence.try_recv().unwrap(), busy);
}

#[test]
fn commands_can_be_added_while_listening() {
    let (transport, outbox, _) = ChannelTransport::new();
    let agent = Agent::new(config(false), Arc::new(transport)).unwrap();
    let handle = agent.spawn().unwrap();

    handle
        .add_command(
            CommandBuilder::new("ping", r"^ping$").executes(|_| Ok(Some("pong".to_string()))),
        )
        .unwrap();
    assert!(handle.send_message(MASTER, "ping"));
    handle.shutdown().unwrap();

    let texts: Vec<_> = outbox.try_iter().map(|m| m.text).collect();
    assert!(texts.contains(&"pong".to_string()));
}

#[test]
fn messages_are_handled_in_order() {
    let (transport, outbox, _) = ChannelTransport::new();
    let agent = Agent::new(config(false), Arc::new(transport)).unwrap();
    agent.add_command(echo_command()).unwrap();

    let handle = agent.spawn().unwrap();
    let sender = handle.sender();
    for i in 0..20 {
        sender
            .send(AgentMessage::Inbound(
                jabbot_core::transport::InboundMessage::new(MASTER, format!("echo {i}")),
            ))
            .unwrap();
    }
    handle.shutdown().unwrap();

    let echoes: Vec<_> = outbox
        .try_iter()
        .map(|m| m.text)
        .filter(|text| text.parse::<u32>().is_ok())
        .collect();
    let expected: Vec<_> = (0..20).map(|i| i.to_string()).collect();
    assert_eq!(echoes, expected);
}

#[test]
fn deliver_reaches_many_recipients() {
    let (transport, outbox, _) = ChannelTransport::new();
    let agent = Agent::new(config(false), Arc::new(transport)).unwrap();

    let delivered = agent.deliver(agent.masters(), "maintenance at noon");
    assert_eq!(delivered, 1);
    assert_eq!(outbox.try_recv().unwrap(), outbound(MASTER, "maintenance at noon"));
}
