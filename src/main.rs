use agent_stream::agent::AgentClient;
use agent_stream::chat::{Conversation, TurnOutcome};
use agent_stream::cli::{self, parse_args, run_cli_command, USAGE};
use agent_stream::config::ClientConfig;
use agent_stream::logging::init_tracing;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use tracing::info;

fn main() -> Result<()> {
    color_eyre::install()?;

    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("error: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };
    let Some(options) = run_cli_command(command) else {
        return Ok(());
    };

    let config = options.apply(ClientConfig::from_env()?);
    config.validate()?;
    init_tracing(&config.log_filter);
    info!(
        "Using agent {} at {} (connect timeout {:?})",
        config.agent_id, config.base_url, config.connect_timeout
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(config, options.message))
}

async fn run(config: ClientConfig, message: Option<String>) -> Result<()> {
    let client = AgentClient::new(&config)?;
    let mut conversation = Conversation::new(client, config.agent_id, config.session_id);

    match message {
        Some(message) => match cli::chat::run_one_shot(&mut conversation, &message).await? {
            Some(TurnOutcome::Completed) => Ok(()),
            Some(TurnOutcome::Failed(reason)) => Err(eyre!("agent reply failed: {}", reason)),
            Some(TurnOutcome::Canceled) => Err(eyre!("reply canceled")),
            None => Err(eyre!("stream ended without a reply")),
        },
        None => cli::chat::run_interactive(&mut conversation).await,
    }
}
