//! Larder - Entry Point
//!
//! Operator command for inspecting and maintaining a Larder cache.

// Force-link larder-providers to ensure linkme registrations are included
extern crate larder_providers;

use clap::Parser;
use larder::cli::{Cli, run};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let output = run(cli).await?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
