// Library interface for ragdesk-cli.
// Integration tests reach the command parser, the formatter and the
// one-shot flow through here.

pub mod commands;
pub mod oneshot;
pub mod render;

pub use commands::{handle_command, CommandResult};
pub use render::{format_message, RenderOptions};
