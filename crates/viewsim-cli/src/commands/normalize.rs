use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use viewsim_core::navigation::normalize;

use super::load_config;

#[derive(Args)]
pub struct NormalizeArgs {
    /// Address bar text (words are joined with spaces)
    #[arg(required = true)]
    pub input: Vec<String>,

    /// View config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &NormalizeArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let raw = args.input.join(" ");
    let address = normalize(&raw, &config.navigation);
    if address.is_empty() {
        println!("(empty input, nothing to load)");
    } else {
        println!("{address}");
    }
    Ok(())
}
