//! Command-line argument parsing.
//!
//! Handles parsing command-line arguments and determining which CLI command
//! to execute. Flags override the environment-derived configuration.

use thiserror::Error;

use crate::config::ClientConfig;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Chat with an agent (default)
    Chat(ChatOptions),
}

/// Flags for the chat command. `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatOptions {
    pub url: Option<String>,
    pub agent: Option<String>,
    pub session: Option<String>,
    /// Send this one message and exit instead of reading stdin
    pub message: Option<String>,
    /// Log at debug level
    pub verbose: bool,
}

impl ChatOptions {
    /// Layer these flags over `config`.
    pub fn apply(&self, config: ClientConfig) -> ClientConfig {
        let mut config = config;
        if let Some(url) = &self.url {
            config = config.with_base_url(url.clone());
        }
        if let Some(agent) = &self.agent {
            config = config.with_agent_id(agent.clone());
        }
        if self.session.is_some() {
            config = config.with_session_id(self.session.clone());
        }
        if self.verbose {
            config = config.with_log_filter("agent_stream=debug");
        }
        config
    }
}

/// Argument errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("missing value for {0}")]
    MissingValue(String),

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
}

/// Usage text printed by `--help`.
pub const USAGE: &str = "\
Usage: agent-stream [OPTIONS]

Chat with a streaming agent. Reads messages from stdin, one per line.
Ctrl-C cancels the reply in progress. Ctrl-D, or Ctrl-C at the prompt, exits.

Options:
      --url <URL>        Backend base URL [env: AGENT_STREAM_URL]
      --agent <ID>       Agent to talk to [env: AGENT_STREAM_AGENT]
      --session <ID>     Continue a conversation [env: AGENT_STREAM_SESSION]
  -m, --message <TEXT>   Send one message, print the reply and exit
  -v, --verbose          Debug logging on stderr
  -h, --help             Print help
  -V, --version          Print version";

/// Parse command-line arguments and return the command to execute.
///
/// # Arguments
///
/// * `args` - Iterator of command-line arguments (typically `std::env::args()`)
///
/// # Examples
///
/// ```
/// use agent_stream::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["agent-stream".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()).unwrap(), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut options = ChatOptions::default();
    // Skip the program name
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };

        let mut value = |name: &str| -> Result<String, ArgsError> {
            inline
                .clone()
                .or_else(|| args.next())
                .ok_or_else(|| ArgsError::MissingValue(name.to_string()))
        };

        match flag.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--url" => options.url = Some(value("--url")?),
            "--agent" => options.agent = Some(value("--agent")?),
            "--session" => options.session = Some(value("--session")?),
            "--message" | "-m" => options.message = Some(value("--message")?),
            "--verbose" | "-v" => options.verbose = true,
            other if other.starts_with('-') => {
                return Err(ArgsError::UnknownOption(other.to_string()))
            }
            other => return Err(ArgsError::UnexpectedArgument(other.to_string())),
        }
    }

    Ok(CliCommand::Chat(options))
}
