//! Console chat driver.
//!
//! Stands in for a chat connection: each stdin line is a chat message,
//! optionally prefixed with the sender (`alice: !sr hero`). Replies go to
//! stdout, one per line. Lines are handled one at a time in arrival order.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Runtime;
use tracing::{debug, info};

use super::build_service;
use crate::chat::ChatCommand;
use crate::config::Config;
use crate::error::ResultExt;
use crate::request::RequestService;

/// Run the console driver until stdin closes or Ctrl+C.
pub fn cmd_console(rt: &Runtime, config: &Config, default_user: &str) -> anyhow::Result<()> {
    rt.block_on(async {
        let service = build_service(config).await?;
        println!(
            "{} tracks loaded. Type chat lines as \"user: message\". Ctrl+C to stop.",
            service.catalogue().len()
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.with_context("reading stdin")? else {
                        break;
                    };
                    if let Some(reply) = handle_line(&service, config, &line, default_user).await {
                        println!("{}", reply);
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Caught interrupt signal, exiting");
                    break;
                }
            }
        }
        Ok::<(), anyhow::Error>(())
    })
}

/// Split `user: message`; lines without a sender use `default_user`.
fn split_sender<'a>(line: &'a str, default_user: &'a str) -> (&'a str, &'a str) {
    match line.split_once(':') {
        Some((user, message))
            if !user.trim().is_empty() && !user.trim().contains(char::is_whitespace) =>
        {
            (user.trim(), message.trim())
        }
        _ => (default_user, line.trim()),
    }
}

/// Handle one chat line and return the reply, if any.
pub(crate) async fn handle_line(
    service: &RequestService,
    config: &Config,
    line: &str,
    default_user: &str,
) -> Option<String> {
    let (user, message) = split_sender(line, default_user);
    debug!(user, line = message, "Chat line");

    match ChatCommand::parse(message, &config.chat.prefix)? {
        ChatCommand::SongRequest { alias, query } => {
            let outcome = service.handle_song_request(user, &query).await;
            let trigger = format!("{}{}", config.chat.prefix, alias);
            Some(outcome.reply(user, &trigger, &config.chat.usage_hint))
        }
        ChatCommand::Ping if service.ledger().policy().is_privileged(user) => {
            Some(format!("[@{}] Pong!", user))
        }
        ChatCommand::Ping => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::Catalogue;
    use crate::cooldown::CooldownLedger;
    use crate::curation::mocks::MockUnmatchedLog;
    use crate::player::traits::mocks::MockPlayer;
    use crate::test_utils::{sample_catalogue, test_policy};
    use std::sync::Arc;

    fn service(catalogue: Catalogue) -> RequestService {
        RequestService::new(
            catalogue,
            CooldownLedger::new(test_policy()),
            Arc::new(MockPlayer::default()),
            Arc::new(MockUnmatchedLog::default()),
        )
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.chat.usage_hint = "Only catalogue tracks.".to_string();
        config
    }

    #[test]
    fn test_split_sender() {
        assert_eq!(split_sender("alice: !sr hero", "viewer"), ("alice", "!sr hero"));
        assert_eq!(split_sender("!sr hero", "viewer"), ("viewer", "!sr hero"));
        // A colon inside the query is not a sender
        assert_eq!(
            split_sender("!sr artist: title", "viewer"),
            ("viewer", "!sr artist: title")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_song_request_reply() {
        let service = service(sample_catalogue());
        let reply = handle_line(&service, &config(), "alice: !sr pegboard hero", "viewer").await;
        assert_eq!(
            reply.as_deref(),
            Some("[@alice] Queued \"Pegboard Nerds - Hero\".")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_usage_reply_echoes_alias() {
        let service = service(sample_catalogue());
        let reply = handle_line(&service, &config(), "alice: !SongReq", "viewer").await;
        assert_eq!(
            reply.as_deref(),
            Some("[@alice] Request songs with \"!songreq name\". Only catalogue tracks.")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_ping_only_for_privileged() {
        let service = service(sample_catalogue());
        let reply = handle_line(&service, &config(), "streamer: !ping", "viewer").await;
        assert_eq!(reply.as_deref(), Some("[@streamer] Pong!"));
        assert_eq!(handle_line(&service, &config(), "alice: !ping", "viewer").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_plain_chat_is_ignored() {
        let service = service(sample_catalogue());
        assert_eq!(handle_line(&service, &config(), "alice: hello there", "viewer").await, None);
    }

    /// In-memory log sink for a scoped subscriber.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<parking_lot::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_chat_line_logged_with_message_text() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let service = service(sample_catalogue());
        handle_line(&service, &config(), "alice: hello there", "viewer").await;

        let output = String::from_utf8(logs.0.lock().clone()).unwrap();
        assert!(output.contains("Chat line"), "{}", output);
        assert!(output.contains("line=\"hello there\""), "{}", output);
    }
}
