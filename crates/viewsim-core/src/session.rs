use tracing::{debug, info};

use crate::bindings::{parse_dimension, UserInput};
use crate::catalog::Catalog;
use crate::config::ViewConfig;
use crate::debounce::Debouncer;
use crate::layout::{self, AvailableRect, LayoutResult};
use crate::messages::{Effect, InboundMessage, OutboundMessage};
use crate::navigation::{NavigationOrigin, NavigationOutcome, NavigationTracker};
use crate::snapshot::ViewSnapshot;
use crate::state::{DeviceSelection, Transition, TransitionContext, ViewportState};
use crate::sync::{HostChannel, SnapshotStore, StateSynchronizer};

/// Debounced event streams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimerKey {
    Resize,
    CustomSize,
}

#[derive(Clone, Debug, PartialEq)]
enum Deferred {
    Recompute(AvailableRect),
    PersistCustomSize,
}

/// One live view: the only writer of its [`ViewportState`].
///
/// Every entry point runs to completion and returns the [`Effect`]s the
/// embedding layer must apply. Time is passed in explicitly (`now_ms`) and
/// debounced work fires from [`Session::tick`].
#[derive(Debug)]
pub struct Session<S, H> {
    catalog: Catalog,
    config: ViewConfig,
    rect: AvailableRect,
    state: ViewportState,
    layout: LayoutResult,
    navigation: NavigationTracker,
    sync: StateSynchronizer<S, H>,
    timers: Debouncer<TimerKey, Deferred>,
}

impl<S: SnapshotStore, H: HostChannel> Session<S, H> {
    /// Start a session, restoring the stored state if there is one.
    ///
    /// Opening never persists; the stored address is replayed into the
    /// content frame as an initial load.
    pub fn open(
        catalog: Catalog,
        config: ViewConfig,
        store: S,
        host: H,
        rect: AvailableRect,
    ) -> (Self, Vec<Effect>) {
        let sync = StateSynchronizer::new(store, host, config.storage_key.clone());
        let stored = sync.load();
        let mut session = Self {
            state: ViewportState::new(&catalog),
            layout: LayoutResult::empty(1.0),
            navigation: NavigationTracker::new(config.navigation.clone()),
            catalog,
            config,
            rect,
            sync,
            timers: Debouncer::new(),
        };

        let transition = match &stored {
            Some(snapshot) => session.with_state(|s, ctx| s.restore_state(ctx, snapshot)),
            None => session.with_state(|s, ctx| s.on_available_rect_changed(ctx)),
        };
        info!(
            key = %session.sync.key(),
            restored = stored.is_some(),
            mode = %session.state.mode(),
            zoom = session.state.zoom_percent(),
            "view session opened"
        );

        session.layout = transition.layout;
        let mut effects = vec![Effect::ApplyLayout(transition.layout)];
        let address = session.state.content_address().to_string();
        let outcome = session.navigation.navigate(
            &mut session.state,
            &address,
            NavigationOrigin::Initial,
        );
        push_navigation(&outcome, &mut effects);
        (session, effects)
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn layout(&self) -> &LayoutResult {
        &self.layout
    }

    pub fn rect(&self) -> AvailableRect {
        self.rect
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn navigation(&self) -> &NavigationTracker {
        &self.navigation
    }

    pub fn store(&self) -> &S {
        self.sync.store()
    }

    pub fn host(&self) -> &H {
        self.sync.host()
    }

    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.timers.is_pending(key)
    }

    /// When [`Session::tick`] next has work to do.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    pub fn status_label(&self) -> String {
        layout::status_label(&self.state, &self.layout)
    }

    // -----------------------------------------------------------------------
    // Entry points
    // -----------------------------------------------------------------------

    pub fn handle_input(&mut self, input: UserInput, now_ms: u64) -> Vec<Effect> {
        let mut effects = Vec::new();
        match input {
            UserInput::ResponsiveClicked => {
                let t = self.with_state(|s, ctx| s.select_responsive(ctx));
                self.commit(t, &mut effects);
            }
            UserInput::CategoryClicked { category } => {
                let t = self.with_state(|s, ctx| s.select_category(ctx, category));
                self.commit(t, &mut effects);
            }
            UserInput::DeviceSelected { id } => {
                let selection = DeviceSelection::from_id(id.trim());
                let t = self.with_state(|s, ctx| s.select_device(ctx, selection));
                self.commit(t, &mut effects);
            }
            UserInput::RotateClicked => {
                let t = self.with_state(|s, ctx| s.toggle_orientation(ctx));
                self.commit(t, &mut effects);
            }
            UserInput::ZoomIn => {
                let t = self.with_state(|s, ctx| s.zoom_in(ctx));
                self.commit(t, &mut effects);
            }
            UserInput::ZoomOut => {
                let t = self.with_state(|s, ctx| s.zoom_out(ctx));
                self.commit(t, &mut effects);
            }
            UserInput::ZoomReset => {
                let t = self.with_state(|s, ctx| s.reset_zoom(ctx));
                self.commit(t, &mut effects);
            }
            UserInput::CustomWidthInput { raw } => {
                if let Some(width) = parse_dimension(&raw) {
                    let height = self.state.custom_device().height() as i64;
                    self.edit_custom_size(width, height, now_ms, &mut effects);
                }
            }
            UserInput::CustomHeightInput { raw } => {
                if let Some(height) = parse_dimension(&raw) {
                    let width = self.state.custom_device().width() as i64;
                    self.edit_custom_size(width, height, now_ms, &mut effects);
                }
            }
            UserInput::CustomWidthCommit { raw } => {
                let height = self.state.custom_device().height() as i64;
                let size = parse_dimension(&raw).map(|width| (width, height));
                self.commit_custom_size(size, &mut effects);
            }
            UserInput::CustomHeightCommit { raw } => {
                let width = self.state.custom_device().width() as i64;
                let size = parse_dimension(&raw).map(|height| (width, height));
                self.commit_custom_size(size, &mut effects);
            }
            UserInput::AddressSubmitted { raw } => {
                self.navigate(&raw, NavigationOrigin::UserOrInternal, &mut effects);
            }
            UserInput::BackClicked => effects.push(Effect::HistoryBack),
            UserInput::ForwardClicked => effects.push(Effect::HistoryForward),
            UserInput::ReloadClicked => self.reload(&mut effects),
            UserInput::DevToolsClicked => self.sync.send(&OutboundMessage::OpenDevTools),
            UserInput::OpenExternalClicked => {
                let address = self.state.content_address();
                if !self.navigation.is_blank(address) {
                    let message = OutboundMessage::OpenExternal {
                        address: address.to_string(),
                    };
                    self.sync.send(&message);
                }
            }
            UserInput::PanelResized { width, height } => {
                let rect = AvailableRect::new(width, height);
                self.timers.schedule(
                    TimerKey::Resize,
                    Deferred::Recompute(rect),
                    now_ms,
                    self.config.timing.resize_debounce_ms,
                );
            }
        }
        effects
    }

    pub fn handle_message(&mut self, message: InboundMessage) -> Vec<Effect> {
        let mut effects = Vec::new();
        match message {
            InboundMessage::Ready => {
                self.sync.announce(&self.state);
                let message = OutboundMessage::AddressChanged {
                    address: self.state.content_address().to_string(),
                };
                self.sync.send(&message);
            }
            InboundMessage::SetAddress {
                address,
                is_initial_load,
            } => {
                let origin = NavigationOrigin::from_initial_load(is_initial_load);
                self.navigate(&address, origin, &mut effects);
            }
            InboundMessage::GoBack => effects.push(Effect::HistoryBack),
            InboundMessage::GoForward => effects.push(Effect::HistoryForward),
            InboundMessage::Reload => self.reload(&mut effects),
            InboundMessage::RestoreState { snapshot } => self.restore(&snapshot, &mut effects),
        }
        effects
    }

    /// The content frame finished loading. `actual` is its real address, or
    /// `None` when it could not be read.
    pub fn content_loaded(&mut self, actual: Option<&str>) -> Vec<Effect> {
        let mut effects = Vec::new();
        let outcome = self.navigation.content_loaded(&mut self.state, actual);
        self.finish_navigation(&outcome, &mut effects);
        effects
    }

    /// Apply a new available rect right away, bypassing the resize debounce.
    pub fn set_available_rect(&mut self, rect: AvailableRect) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.timers.cancel(TimerKey::Resize);
        self.apply_rect(rect, &mut effects);
        effects
    }

    /// Run every debounced action due at `now_ms`.
    pub fn tick(&mut self, now_ms: u64) -> Vec<Effect> {
        let mut effects = Vec::new();
        for (key, action) in self.timers.take_ready(now_ms) {
            debug!(?key, now_ms, "debounced action fired");
            match action {
                Deferred::Recompute(rect) => self.apply_rect(rect, &mut effects),
                Deferred::PersistCustomSize => self.sync.notify_changed(&self.state),
            }
        }
        effects
    }

    /// End the session: drop pending timers, persist once more and hand the
    /// collaborators back.
    pub fn close(mut self) -> (S, H) {
        self.timers.cancel_all();
        self.sync.flush(&self.state);
        debug!(key = %self.sync.key(), "view session closed");
        self.sync.into_parts()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn with_state(
        &mut self,
        apply: impl FnOnce(&mut ViewportState, &TransitionContext<'_>) -> Transition,
    ) -> Transition {
        let ctx = TransitionContext::new(&self.catalog, &self.config, self.rect);
        apply(&mut self.state, &ctx)
    }

    fn apply_layout(&mut self, layout: LayoutResult, effects: &mut Vec<Effect>) {
        if layout != self.layout {
            self.layout = layout;
            effects.push(Effect::ApplyLayout(layout));
        }
    }

    /// Apply a user-caused transition and report it when the state changed.
    fn commit(&mut self, transition: Transition, effects: &mut Vec<Effect>) {
        self.apply_layout(transition.layout, effects);
        if transition.changed {
            self.sync.notify_changed(&self.state);
        }
    }

    fn apply_rect(&mut self, rect: AvailableRect, effects: &mut Vec<Effect>) {
        self.rect = rect;
        let t = self.with_state(|s, ctx| s.on_available_rect_changed(ctx));
        self.commit(t, effects);
    }

    /// Live custom-size edit: relayout now, persist after the input settles.
    fn edit_custom_size(
        &mut self,
        width: i64,
        height: i64,
        now_ms: u64,
        effects: &mut Vec<Effect>,
    ) {
        let t = self.with_state(|s, ctx| s.set_custom_device_size(ctx, width, height));
        self.apply_layout(t.layout, effects);
        if t.changed {
            self.timers.schedule(
                TimerKey::CustomSize,
                Deferred::PersistCustomSize,
                now_ms,
                self.config.timing.input_debounce_ms,
            );
        }
    }

    /// The custom size field was committed: persist immediately.
    fn commit_custom_size(&mut self, size: Option<(i64, i64)>, effects: &mut Vec<Effect>) {
        let pending = self.timers.cancel(TimerKey::CustomSize).is_some();
        let changed = match size {
            Some((width, height)) => {
                let t = self.with_state(|s, ctx| s.set_custom_device_size(ctx, width, height));
                self.apply_layout(t.layout, effects);
                t.changed
            }
            None => false,
        };
        if pending || changed {
            self.sync.notify_changed(&self.state);
        }
    }

    fn restore(&mut self, snapshot: &ViewSnapshot, effects: &mut Vec<Effect>) {
        // A pending resize still carries the panel's real size.
        self.timers.cancel(TimerKey::CustomSize);
        if let Some(Deferred::Recompute(rect)) = self.timers.cancel(TimerKey::Resize) {
            self.rect = rect;
        }
        self.sync.on_external_restore();
        let t = self.with_state(|s, ctx| s.restore_state(ctx, snapshot));
        self.apply_layout(t.layout, effects);
        // Consumes the suppression armed above, so nothing is written back.
        self.sync.notify_changed(&self.state);

        let address = self.state.content_address().to_string();
        let outcome = self
            .navigation
            .navigate(&mut self.state, &address, NavigationOrigin::Initial);
        push_navigation(&outcome, effects);
    }

    fn navigate(&mut self, raw: &str, origin: NavigationOrigin, effects: &mut Vec<Effect>) {
        let outcome = self.navigation.navigate(&mut self.state, raw, origin);
        self.finish_navigation(&outcome, effects);
    }

    fn finish_navigation(&mut self, outcome: &NavigationOutcome, effects: &mut Vec<Effect>) {
        push_navigation(outcome, effects);
        if outcome.address_changed {
            self.sync.notify_address_changed(&self.state);
        }
    }

    fn reload(&mut self, effects: &mut Vec<Effect>) {
        if self.navigation.can_reload(&self.state) {
            effects.push(Effect::Reload);
        } else {
            debug!("reload ignored on blank content");
        }
    }
}

fn push_navigation(outcome: &NavigationOutcome, effects: &mut Vec<Effect>) {
    if let Some(load) = &outcome.load {
        effects.push(Effect::Load(load.clone()));
    }
    if let Some(shown) = &outcome.shown {
        effects.push(Effect::ShowAddress(shown.clone()));
    }
}
