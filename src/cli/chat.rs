//! Terminal chat front-end.
//!
//! Reply text goes to stdout as it streams; status lines go to stderr.
//! Ctrl-C cancels the reply in flight, or exits at the prompt.

use futures_util::StreamExt;
use std::future::Future;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::agent::AgentStream;
use crate::chat::{Conversation, TurnOutcome, FAILURE_MESSAGE};
use crate::events::UpdateSource;

/// Print one reply as it streams, canceling it when `interrupt` fires.
///
/// Returns `None` if the stream ended without a terminal update.
pub async fn stream_reply<W, F>(
    conversation: &mut Conversation,
    mut stream: AgentStream,
    out: &mut W,
    interrupt: F,
) -> io::Result<Option<TurnOutcome>>
where
    W: Write,
    F: Future<Output = ()>,
{
    tokio::pin!(interrupt);
    let mut interrupted = false;
    let handle = stream.handle();

    loop {
        tokio::select! {
            _ = &mut interrupt, if !interrupted => {
                debug!("Interrupt received, canceling reply");
                interrupted = true;
                stream.cancel();
            }
            update = stream.next() => {
                let Some(update) = update else {
                    return Ok(None);
                };

                if let Some(text) = update.artifact_text() {
                    write!(out, "{}", text)?;
                    out.flush()?;
                } else if update.source() == Some(UpdateSource::Status) {
                    if let Some(text) = update.text() {
                        eprintln!("… {}", text);
                    }
                }

                if let Some(outcome) = conversation.apply(&handle, &update) {
                    match &outcome {
                        TurnOutcome::Failed(reason) => {
                            warn!("Reply failed: {}", reason);
                            writeln!(out, "\n{}", FAILURE_MESSAGE)?;
                        }
                        TurnOutcome::Completed | TurnOutcome::Canceled => writeln!(out)?,
                    }
                    return Ok(Some(outcome));
                }
            }
        }
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Send one message, print the reply, and report how it ended.
pub async fn run_one_shot(
    conversation: &mut Conversation,
    message: &str,
) -> color_eyre::Result<Option<TurnOutcome>> {
    let stream = conversation.send(message)?;
    let mut stdout = io::stdout();
    Ok(stream_reply(conversation, stream, &mut stdout, ctrl_c()).await?)
}

/// Read messages from stdin until end of input or Ctrl-C at the prompt.
pub async fn run_interactive(conversation: &mut Conversation) -> color_eyre::Result<()> {
    let input = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();
    chat_loop(conversation, input, &mut stdout, ctrl_c).await?;
    Ok(())
}

/// Prompt, send and print replies until `input` ends or `interrupt` fires
/// while waiting for a line.
pub async fn chat_loop<R, W, I, F>(
    conversation: &mut Conversation,
    input: R,
    out: &mut W,
    mut interrupt: I,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    I: FnMut() -> F,
    F: Future<Output = ()>,
{
    let mut lines = input.lines();

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = interrupt() => {
                debug!("Interrupt at prompt, leaving chat");
                None
            }
        };
        let Some(line) = line else {
            writeln!(out)?;
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match conversation.send(&line) {
            Ok(stream) => {
                stream_reply(conversation, stream, out, interrupt()).await?;
            }
            Err(e) => warn!("Not sent: {}", e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::agent::AgentClient;
    use std::sync::Arc;

    fn conversation(response: MockResponse) -> Conversation {
        let http = MockHttpClient::with_default(response);
        let client = AgentClient::with_http("http://agents.test", Arc::new(http));
        Conversation::new(client, "helper", None)
    }

    #[tokio::test]
    async fn test_prints_reply_text_only() {
        let mut conversation = conversation(MockResponse::chunks([
            "data: {\"type\":\"status\",\"message\":\"thinking\",\"state\":\"working\"}\n\n",
            "data: {\"type\":\"artifact\",\"content\":\"Hel\"}\n\n",
            "data: {\"type\":\"artifact\",\"content\":\"lo\"}\n\n",
            "data: {\"type\":\"status\",\"state\":\"completed\"}\n\n",
        ]));
        let stream = conversation.send("Hi").unwrap();

        let mut out = Vec::new();
        let outcome = stream_reply(&mut conversation, stream, &mut out, std::future::pending())
            .await
            .unwrap();

        assert_eq!(outcome, Some(TurnOutcome::Completed));
        assert_eq!(String::from_utf8(out).unwrap(), "Hello\n");
    }

    #[tokio::test]
    async fn test_failure_prints_generic_message() {
        let mut conversation = conversation(MockResponse::chunks([
            "data: {\"type\":\"error\",\"message\":\"boom\"}\n\n",
        ]));
        let stream = conversation.send("Hi").unwrap();

        let mut out = Vec::new();
        let outcome = stream_reply(&mut conversation, stream, &mut out, std::future::pending())
            .await
            .unwrap();

        assert_eq!(outcome, Some(TurnOutcome::Failed("boom".to_string())));
        assert_eq!(String::from_utf8(out).unwrap(), format!("\n{}\n", FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn test_chat_loop_until_end_of_input() {
        let mut conversation = conversation(MockResponse::chunks([
            "data: {\"type\":\"artifact\",\"content\":\"Hi!\"}\n\n",
            "data: {\"type\":\"status\",\"state\":\"completed\"}\n\n",
        ]));

        let input: &[u8] = b"Hello\n\n";
        let mut out = Vec::new();
        chat_loop(&mut conversation, input, &mut out, std::future::pending::<()>)
            .await
            .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "> Hi!\n> > \n");
        assert_eq!(conversation.transcript().messages().len(), 2);
    }

    #[tokio::test]
    async fn test_interrupt_at_prompt_exits() {
        let mut conversation = conversation(MockResponse::Hang);
        let (_keep_open, input) = tokio::io::duplex(64);

        let mut out = Vec::new();
        let result = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            chat_loop(&mut conversation, BufReader::new(input), &mut out, || async {}),
        )
        .await;

        assert!(matches!(result, Ok(Ok(()))));
        assert_eq!(String::from_utf8(out).unwrap(), "> \n");
        assert!(conversation.transcript().messages().is_empty());
    }

    #[tokio::test]
    async fn test_interrupt_cancels_reply() {
        let mut conversation = conversation(MockResponse::chunks_then_hang([
            "data: {\"type\":\"artifact\",\"content\":\"partial\"}\n\n",
        ]));
        let stream = conversation.send("Hi").unwrap();

        let mut out = Vec::new();
        let interrupt = tokio::time::sleep(std::time::Duration::from_millis(50));
        let outcome = stream_reply(&mut conversation, stream, &mut out, interrupt)
            .await
            .unwrap();

        assert_eq!(outcome, Some(TurnOutcome::Canceled));
        assert_eq!(String::from_utf8(out).unwrap(), "partial\n");
        assert!(!conversation.is_busy());
    }
}
