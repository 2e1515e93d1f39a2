//! Environment-driven configuration tests.
//!
//! Serialized because they mutate process-wide environment variables.

use std::time::Duration;

use agent_stream::cli::{parse_args, CliCommand};
use agent_stream::config::{
    ClientConfig, ConfigError, ENV_AGENT, ENV_CONNECT_TIMEOUT, ENV_LOG, ENV_SESSION, ENV_URL,
};
use serial_test::serial;

const ALL: [&str; 5] = [ENV_URL, ENV_AGENT, ENV_SESSION, ENV_CONNECT_TIMEOUT, ENV_LOG];

fn clear_env() {
    for key in ALL {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_from_env_without_variables() {
    clear_env();
    assert_eq!(ClientConfig::from_env().unwrap(), ClientConfig::default());
}

#[test]
#[serial]
fn test_from_env_reads_every_variable() {
    clear_env();
    std::env::set_var(ENV_URL, "https://agents.example.com");
    std::env::set_var(ENV_AGENT, "support");
    std::env::set_var(ENV_SESSION, "sess-7");
    std::env::set_var(ENV_CONNECT_TIMEOUT, "0");
    std::env::set_var(ENV_LOG, "agent_stream=trace");

    let config = ClientConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.base_url, "https://agents.example.com");
    assert_eq!(config.agent_id, "support");
    assert_eq!(config.session_id.as_deref(), Some("sess-7"));
    assert_eq!(config.connect_timeout, None);
    assert_eq!(config.log_filter, "agent_stream=trace");
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_rejects_bad_timeout() {
    clear_env();
    std::env::set_var(ENV_CONNECT_TIMEOUT, "ten");
    let result = ClientConfig::from_env();
    clear_env();

    assert_eq!(result.unwrap_err(), ConfigError::InvalidTimeout("ten".to_string()));
}

#[test]
#[serial]
fn test_flags_override_environment() {
    clear_env();
    std::env::set_var(ENV_URL, "https://env.example.com");
    std::env::set_var(ENV_AGENT, "env-agent");
    let env_config = ClientConfig::from_env().unwrap();
    clear_env();

    let args = ["agent-stream", "--agent", "flag-agent"].map(String::from);
    let CliCommand::Chat(options) = parse_args(args.into_iter()).unwrap() else {
        panic!("expected chat command");
    };
    let config = options.apply(env_config);

    assert_eq!(config.base_url, "https://env.example.com");
    assert_eq!(config.agent_id, "flag-agent");
    assert_eq!(config.connect_timeout, Some(Duration::from_secs(10)));
}
