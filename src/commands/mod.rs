// ABOUTME: Command module aggregator for the deploy-relay CLI.
// ABOUTME: Re-exports deploy and status command handlers.

mod deploy;
mod status;

pub use deploy::deploy;
pub use status::status;
