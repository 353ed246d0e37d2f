use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tracing::info;
use viewsim_core::bindings::UserInput;
use viewsim_core::catalog::Catalog;
use viewsim_core::config::ViewConfig;
use viewsim_core::layout::AvailableRect;
use viewsim_core::messages::{Effect, InboundMessage};
use viewsim_core::session::Session;
use viewsim_core::sync::{MemoryStore, SnapshotStore};

use super::load_config;
use crate::host::StdoutChannel;
use crate::store::JsonFileStore;
use crate::summary::{self, ReplayTotals};

#[derive(Args)]
pub struct ReplayArgs {
    /// Event script (TOML)
    pub script: PathBuf,

    /// Persist view state to this JSON file instead of memory
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// View config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// A timed sequence of inputs, host messages and load notifications.
#[derive(Debug, Deserialize)]
pub struct ReplayScript {
    pub panel: Panel,
    #[serde(default, rename = "event")]
    pub events: Vec<ScriptEvent>,
}

#[derive(Debug, Deserialize)]
pub struct Panel {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Deserialize)]
pub struct ScriptEvent {
    /// Milliseconds since the session opened.
    pub at: u64,
    pub input: Option<UserInput>,
    pub message: Option<InboundMessage>,
    /// The content frame finished loading this address.
    pub loaded: Option<String>,
}

enum Step {
    Input(UserInput),
    Message(InboundMessage),
    Loaded(String),
}

impl ScriptEvent {
    fn step(&self) -> Result<Step> {
        match (&self.input, &self.message, &self.loaded) {
            (Some(input), None, None) => Ok(Step::Input(input.clone())),
            (None, Some(message), None) => Ok(Step::Message(message.clone())),
            (None, None, Some(address)) => Ok(Step::Loaded(address.clone())),
            _ => bail!(
                "Event at {} ms must set exactly one of input, message or loaded",
                self.at
            ),
        }
    }
}

pub fn parse_script(contents: &str) -> Result<ReplayScript> {
    let mut script: ReplayScript = toml::from_str(contents).context("Invalid replay script")?;
    script.events.sort_by_key(|e| e.at);
    for event in &script.events {
        event.step()?;
    }
    Ok(script)
}

pub fn run(args: &ReplayArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let contents = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read script {}", args.script.display()))?;
    let script = parse_script(&contents)?;

    let totals = match &args.store {
        Some(path) => {
            let (store, totals) = replay(&script, config, JsonFileStore::new(path))?;
            println!(
                "State saved to {} ({} writes)",
                store.path().display(),
                store.save_count()
            );
            totals
        }
        None => replay(&script, config, MemoryStore::new())?.1,
    };

    summary::print_replay_summary(&totals);
    Ok(())
}

fn replay<S: SnapshotStore>(
    script: &ReplayScript,
    config: ViewConfig,
    store: S,
) -> Result<(S, ReplayTotals)> {
    let pb = ProgressBar::new(script.events.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Replaying");

    let rect = AvailableRect::new(script.panel.width, script.panel.height);
    let host = StdoutChannel::with_progress(pb.clone());
    let (mut session, effects) =
        Session::open(Catalog::builtin().clone(), config, store, host, rect);

    let mut totals = ReplayTotals {
        events: script.events.len(),
        effects: 0,
        messages: 0,
        elapsed_ms: 0,
    };
    report(&pb, &session, 0, "open", &effects, &mut totals);

    for event in &script.events {
        run_due(&pb, &mut session, event.at, &mut totals);
        let (label, effects) = match event.step()? {
            Step::Input(input) => (format!("{input:?}"), session.handle_input(input, event.at)),
            Step::Message(message) => (format!("{message:?}"), session.handle_message(message)),
            Step::Loaded(address) => (
                format!("loaded {address}"),
                session.content_loaded(Some(&address)),
            ),
        };
        report(&pb, &session, event.at, &label, &effects, &mut totals);
        totals.elapsed_ms = event.at;
        pb.inc(1);
    }
    while let Some(deadline) = session.next_deadline() {
        run_due(&pb, &mut session, deadline, &mut totals);
        totals.elapsed_ms = deadline;
    }
    pb.finish_with_message("Done");

    let (store, host) = session.close();
    totals.messages = host.sent_count();
    info!(
        events = totals.events,
        effects = totals.effects,
        messages = totals.messages,
        "replay finished"
    );
    Ok((store, totals))
}

/// Fire the debounced work whose deadline is at or before `now_ms`.
fn run_due<S: SnapshotStore>(
    pb: &ProgressBar,
    session: &mut Session<S, StdoutChannel>,
    now_ms: u64,
    totals: &mut ReplayTotals,
) {
    while let Some(deadline) = session.next_deadline().filter(|&d| d <= now_ms) {
        let effects = session.tick(deadline);
        report(pb, session, deadline, "timer", &effects, totals);
    }
}

fn report<S: SnapshotStore>(
    pb: &ProgressBar,
    session: &Session<S, StdoutChannel>,
    at: u64,
    label: &str,
    effects: &[Effect],
    totals: &mut ReplayTotals,
) {
    totals.effects += effects.len();
    pb.suspend(|| {
        println!("{:>6} ms  {}  [{}]", at, label, session.status_label());
        for effect in effects {
            println!("            {}", summary::describe_effect(effect));
        }
    });
}
