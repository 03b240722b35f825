//! CLI module for the SmartRoute gateway
//!
//! - `serve`: run the HTTP gateway (default)
//! - `classify`: show how the configured rule table labels a prompt

pub mod classify;
pub mod serve;

use clap::{Parser, Subcommand};

/// SmartRoute - semantic caching and cost-aware routing for LLM backends
#[derive(Parser)]
#[command(name = "smartroute-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP gateway (default)
    Serve,

    /// Classify a prompt with the configured rule table
    Classify(classify::ClassifyArgs),
}
