//! Auto-join bot
//!
//! Connects, joins a channel once the server welcomes us (numeric 001) and
//! quits cleanly on Ctrl+C.
//!
//! ```text
//! cargo run --example auto_join -- [server:port] [nick] [#channel]
//! RUST_LOG=ircsess=debug cargo run --example auto_join
//! ```

use std::time::Duration;

use anyhow::Context;
use ircsess::{command, Event, Message, MessageKind, Session, SessionConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_SERVER: &str = "irc.libera.chat:6667";
const DEFAULT_NICK: &str = "gobotgo";
const DEFAULT_CHANNEL: &str = "#notaboutlegos";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let server = args.next().unwrap_or_else(|| DEFAULT_SERVER.to_string());
    let nick = args.next().unwrap_or_else(|| DEFAULT_NICK.to_string());
    let channel = args.next().unwrap_or_else(|| DEFAULT_CHANNEL.to_string());

    let config = SessionConfig::new(nick.clone(), "hi", "hey", server)
        .with_alternate_nick(format!("{}_", nick))
        .with_inactivity_timeout(Duration::from_secs(240));

    let session = Session::create(config, move |session: Session, event: Event| {
        let channel = channel.clone();
        async move { handle_event(session, event, &channel).await }
    })
    .await
    .context("session creation failed")?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;

    session.destroy("Leaving").await;
    Ok(())
}

async fn handle_event(session: Session, event: Event, channel: &str) {
    match event {
        Event::Connect => {
            info!("-- Connected to {} --", session.config().server_address);
        }
        Event::Disconnect => {
            info!("-- Disconnected from {} --", session.config().server_address);
        }
        Event::Message(message) => handle_message(&session, &message, channel).await,
    }
}

async fn handle_message(session: &Session, message: &Message, channel: &str) {
    match message.kind {
        MessageKind::Raw if message.raw_token == "001" => {
            session.send(command::join(channel)).await;
        }
        MessageKind::Privmsg if message.data == "!ping" => {
            if let Some(target) = message.reply_target(session.nick()) {
                session.send(command::privmsg(target, "pong")).await;
            }
        }
        _ => {}
    }
}
