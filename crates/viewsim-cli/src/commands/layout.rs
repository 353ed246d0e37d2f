use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use serde_json::json;
use viewsim_core::catalog::Catalog;
use viewsim_core::layout::{status_label, AvailableRect};
use viewsim_core::state::{DeviceSelection, TransitionContext, ViewportState};

use super::load_config;
use crate::summary;

#[derive(Args)]
pub struct LayoutArgs {
    /// Device preset id, or "custom" (responsive when omitted)
    #[arg(short, long)]
    pub device: Option<String>,

    /// Simulate the device in landscape
    #[arg(long, requires = "device")]
    pub landscape: bool,

    /// Custom device size as WIDTHxHEIGHT
    #[arg(long, value_parser = parse_size)]
    pub custom: Option<(i64, i64)>,

    /// Available panel width in CSS pixels
    #[arg(long, default_value = "1280")]
    pub width: f64,

    /// Available panel height in CSS pixels
    #[arg(long, default_value = "800")]
    pub height: f64,

    /// Manual responsive zoom in percent
    #[arg(short, long, conflicts_with = "device")]
    pub zoom: Option<u32>,

    /// View config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_size(raw: &str) -> std::result::Result<(i64, i64), String> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{raw}'"))?;
    let w = w.trim().parse().map_err(|_| format!("bad width '{w}'"))?;
    let h = h.trim().parse().map_err(|_| format!("bad height '{h}'"))?;
    Ok((w, h))
}

pub fn run(args: &LayoutArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let catalog = Catalog::builtin();
    let rect = AvailableRect::new(args.width, args.height);
    let ctx = TransitionContext::new(catalog, &config, rect);

    let mut state = ViewportState::new(catalog);
    let mut transition = state.on_available_rect_changed(&ctx);
    if let Some((w, h)) = args.custom {
        transition = state.set_custom_device_size(&ctx, w, h);
    }
    if let Some(ref id) = args.device {
        if id != "custom" && catalog.lookup(id).is_none() {
            bail!("Unknown device '{}' (see `viewsim devices`)", id);
        }
        transition = state.select_device(&ctx, DeviceSelection::from_id(id));
        if args.landscape {
            transition = state.toggle_orientation(&ctx);
        }
    }
    if let Some(zoom) = args.zoom {
        let delta = zoom as i32 - state.zoom_percent() as i32;
        transition = state.adjust_zoom(&ctx, delta);
    }
    let layout = transition.layout;

    if args.json {
        let value = json!({
            "state": state.snapshot(),
            "layout": layout,
            "status": status_label(&state, &layout),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        summary::print_state("Viewport Layout", &state, &layout, rect);
    }
    Ok(())
}
