//! CLI module.
//!
//! Argument parsing, version display, and the chat front-end.
//!
//! # Usage
//!
//! ```ignore
//! use agent_stream::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args())?;
//! if let Some(options) = run_cli_command(command) {
//!     // chat with `options`
//! }
//! ```

pub mod args;
pub mod chat;
pub mod version;

pub use args::{parse_args, ArgsError, ChatOptions, CliCommand, USAGE};
pub use version::{version_line, VERSION};

/// Handle commands that only print something.
///
/// Returns the chat options when the command is a chat session.
pub fn run_cli_command(command: CliCommand) -> Option<ChatOptions> {
    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            None
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            None
        }
        CliCommand::Chat(options) => Some(options),
    }
}
