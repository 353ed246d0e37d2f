use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use viewsim_core::catalog::Catalog;
use viewsim_core::layout::AvailableRect;
use viewsim_core::state::{TransitionContext, ViewportState};
use viewsim_core::sync::SnapshotStore;

use super::load_config;
use crate::store::JsonFileStore;
use crate::summary;

#[derive(Args)]
pub struct StateArgs {
    /// JSON store file written by `viewsim replay --store`
    pub store: PathBuf,

    /// View config file (TOML); selects the storage key
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Available panel width used to lay out the restored state
    #[arg(long, default_value = "1280")]
    pub width: f64,

    /// Available panel height used to lay out the restored state
    #[arg(long, default_value = "800")]
    pub height: f64,

    /// Print the stored and restored snapshots as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &StateArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let store = JsonFileStore::new(&args.store);
    let stored = store
        .load(&config.storage_key)
        .with_context(|| format!("Failed to read store {}", args.store.display()))?;

    let Some(stored) = stored else {
        println!(
            "No view state stored under '{}' in {}",
            config.storage_key,
            args.store.display()
        );
        return Ok(());
    };

    let catalog = Catalog::builtin();
    let rect = AvailableRect::new(args.width, args.height);
    let ctx = TransitionContext::new(catalog, &config, rect);
    let mut state = ViewportState::new(catalog);
    let transition = state.restore_state(&ctx, &stored);

    if args.json {
        let value = json!({
            "stored": stored,
            "restored": state.snapshot(),
            "layout": transition.layout,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        summary::print_state(
            &format!("Stored State ({})", config.storage_key),
            &state,
            &transition.layout,
            rect,
        );
    }
    Ok(())
}
