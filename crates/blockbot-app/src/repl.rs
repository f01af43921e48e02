//! Line-oriented terminal front-end over one dialogue session.
//!
//! Plain lines are user messages. Slash commands:
//! `/topics`, `/topic <n|label>`, `/upload <file>`, `/transfers`, `/quit`.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use blockbot_chat::{ChatError, DialogueController, PresetTopic, Role, TurnInput};
use blockbot_core::types::format_millis_local;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Topics,
    Topic(String),
    Upload(String),
    Transfers,
    Quit,
    Say(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        match head {
            "/topics" => Command::Topics,
            "/topic" => Command::Topic(rest.to_string()),
            "/upload" => Command::Upload(rest.to_string()),
            "/transfers" => Command::Transfers,
            "/quit" | "/exit" => Command::Quit,
            _ => Command::Say(line.to_string()),
        }
    }
}

/// Look a topic up by 1-based position in the list or by label.
pub fn resolve_topic(arg: &str) -> Result<PresetTopic, ChatError> {
    if let Ok(n) = arg.trim().parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| PresetTopic::ALL.get(i).copied())
            .ok_or_else(|| ChatError::UnknownTopic(arg.to_string()));
    }
    arg.parse()
}

/// Run the conversation until `/quit` or end of input.
pub async fn run<R, W>(
    controller: &DialogueController,
    reader: R,
    mut out: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    for turn in controller.history() {
        if turn.role == Role::Assistant {
            write_reply(&mut out, &turn.content).await?;
        }
    }

    let mut lines = reader.lines();
    loop {
        out.write_all(b"> ").await?;
        out.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let input = match Command::parse(&line) {
            Command::Quit => break,
            Command::Topics => {
                let mut listing = String::new();
                for (i, topic) in PresetTopic::ALL.iter().enumerate() {
                    listing.push_str(&format!("{:>2}. {}\n", i + 1, topic.label()));
                }
                out.write_all(listing.as_bytes()).await?;
                continue;
            }
            Command::Transfers => {
                write_transfers(controller, &mut out).await?;
                continue;
            }
            Command::Topic(arg) => match resolve_topic(&arg) {
                Ok(topic) => TurnInput::Topic(topic),
                Err(e) => {
                    out.write_all(format!("{}. Try /topics.\n", e).as_bytes())
                        .await?;
                    continue;
                }
            },
            Command::Upload(file) => TurnInput::upload(&file),
            Command::Say(text) => TurnInput::Text(text),
        };

        match controller.handle_turn(input).await {
            Ok(Some(turn)) => write_reply(&mut out, &turn.content).await?,
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(error = %e, "Turn refused");
                out.write_all(format!("{}\n", e).as_bytes()).await?;
            }
        }
    }

    out.flush().await
}

async fn write_reply<W: AsyncWrite + Unpin>(out: &mut W, content: &str) -> std::io::Result<()> {
    out.write_all(format!("\nBlockBot: {}\n\n", content).as_bytes())
        .await
}

async fn write_transfers<W: AsyncWrite + Unpin>(
    controller: &DialogueController,
    out: &mut W,
) -> std::io::Result<()> {
    let transfers = controller.transfers();
    if transfers.is_empty() {
        return out.write_all(b"No completed transfers yet.\n").await;
    }
    let mut listing = String::new();
    for receipt in transfers {
        listing.push_str(&format!(
            "{}  {} -> {}  ({})\n",
            receipt.transaction_id,
            receipt.amount,
            receipt.receiver_id,
            format_millis_local(receipt.timestamp)
        ));
    }
    out.write_all(listing.as_bytes()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use blockbot_chat::ScriptedGenerator;
    use blockbot_core::BlockbotConfig;

    fn controller() -> DialogueController {
        let mut config = BlockbotConfig::default();
        config.transfer.verification_delay_ms = 0;
        DialogueController::new(&config, Arc::new(ScriptedGenerator::new().with_response("Answer.")))
    }

    async fn run_script(ctrl: &DialogueController, script: &str) -> String {
        let mut out = Vec::new();
        run(ctrl, script.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    // ---- Command parsing ----

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/topics"), Command::Topics);
        assert_eq!(Command::parse("/topic 3"), Command::Topic("3".to_string()));
        assert_eq!(
            Command::parse("/topic  Start KYC "),
            Command::Topic("Start KYC".to_string())
        );
        assert_eq!(
            Command::parse("/upload my passport.png"),
            Command::Upload("my passport.png".to_string())
        );
        assert_eq!(Command::parse("/transfers"), Command::Transfers);
        assert_eq!(Command::parse("/quit"), Command::Quit);
        assert_eq!(
            Command::parse("what is a rollup?"),
            Command::Say("what is a rollup?".to_string())
        );
    }

    #[test]
    fn test_unknown_slash_is_a_message() {
        assert_eq!(Command::parse("/shrug"), Command::Say("/shrug".to_string()));
    }

    // ---- Topic lookup ----

    #[test]
    fn test_resolve_topic_by_number_and_label() {
        assert_eq!(resolve_topic("1").unwrap(), PresetTopic::SmartContracts);
        assert_eq!(resolve_topic("12").unwrap(), PresetTopic::TransferFunds);
        assert_eq!(resolve_topic("start kyc").unwrap(), PresetTopic::StartKyc);
    }

    #[test]
    fn test_resolve_topic_out_of_range() {
        assert!(matches!(resolve_topic("0"), Err(ChatError::UnknownTopic(_))));
        assert!(matches!(resolve_topic("13"), Err(ChatError::UnknownTopic(_))));
        assert!(resolve_topic("Gardening").is_err());
    }

    // ---- Loop ----

    #[tokio::test]
    async fn test_run_prints_welcome_and_reply() {
        let ctrl = controller();
        let output = run_script(&ctrl, "What is a rollup?\n/quit\nnever read\n").await;
        assert!(output.contains("BlockBot: Welcome to BlockBot!"));
        assert!(output.contains("BlockBot: Answer."));
        assert_eq!(ctrl.turn_count(), 3);
    }

    #[tokio::test]
    async fn test_run_upload_and_topic_commands() {
        let ctrl = controller();
        let output = run_script(&ctrl, "/topic 11\n/upload passport.png\n").await;
        assert!(output.contains("KYC verification process"));
        assert!(output.contains("passport.png"));
        assert_eq!(ctrl.documents().len(), 1);
    }

    #[tokio::test]
    async fn test_run_topics_and_bad_topic() {
        let ctrl = controller();
        let output = run_script(&ctrl, "/topics\n/topic 99\n").await;
        assert!(output.contains(" 1. Smart Contracts"));
        assert!(output.contains("unknown topic: 99"));
        assert_eq!(ctrl.turn_count(), 1);
    }

    #[tokio::test]
    async fn test_run_transfers_listing() {
        let ctrl = controller();
        let output = run_script(&ctrl, "/transfers\n").await;
        assert!(output.contains("No completed transfers yet."));
    }

    #[tokio::test]
    async fn test_run_blank_lines_are_ignored() {
        let ctrl = controller();
        run_script(&ctrl, "\n   \n").await;
        assert_eq!(ctrl.turn_count(), 1);
    }
}
