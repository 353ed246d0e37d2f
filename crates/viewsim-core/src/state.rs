use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{Catalog, DeviceCategory, DeviceProfile, Dimensions};
use crate::config::ViewConfig;
use crate::consts::{
    BLANK_ADDRESS, CUSTOM_DEVICE_ID, CUSTOM_DEVICE_MAX, CUSTOM_DEVICE_MIN, DEFAULT_CUSTOM_HEIGHT,
    DEFAULT_CUSTOM_WIDTH, DEFAULT_ZOOM_PERCENT,
};
use crate::layout::{self, AvailableRect, LayoutResult};
use crate::snapshot::ViewSnapshot;

/// Display mode of the simulated viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Responsive,
    Device,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Responsive => write!(f, "responsive"),
            Self::Device => write!(f, "device"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn toggled(self) -> Self {
        match self {
            Self::Portrait => Self::Landscape,
            Self::Landscape => Self::Portrait,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Portrait => write!(f, "portrait"),
            Self::Landscape => write!(f, "landscape"),
        }
    }
}

/// Which device a category points at: a catalog preset or the custom spec.
///
/// On the wire this is the plain device id, with `"custom"` as the sentinel.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceSelection {
    Preset(String),
    Custom,
}

impl DeviceSelection {
    pub fn from_id(id: &str) -> Self {
        if id == CUSTOM_DEVICE_ID {
            Self::Custom
        } else {
            Self::Preset(id.to_string())
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Preset(id) => id,
            Self::Custom => CUSTOM_DEVICE_ID,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom)
    }
}

impl From<String> for DeviceSelection {
    fn from(id: String) -> Self {
        if id == CUSTOM_DEVICE_ID {
            Self::Custom
        } else {
            Self::Preset(id)
        }
    }
}

impl From<DeviceSelection> for String {
    fn from(selection: DeviceSelection) -> Self {
        match selection {
            DeviceSelection::Preset(id) => id,
            DeviceSelection::Custom => CUSTOM_DEVICE_ID.to_string(),
        }
    }
}

impl fmt::Display for DeviceSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// User-editable size of the custom device, clamped to
/// `[CUSTOM_DEVICE_MIN, CUSTOM_DEVICE_MAX]` on every edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CustomDeviceSpec {
    width: u32,
    height: u32,
}

impl CustomDeviceSpec {
    pub fn new(width: i64, height: i64) -> Self {
        Self {
            width: clamp_custom(width),
            height: clamp_custom(height),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// The spec as a device profile (landscape is the rotated spec).
    pub fn profile(&self) -> DeviceProfile {
        DeviceProfile::new(
            CUSTOM_DEVICE_ID,
            "Custom",
            DeviceCategory::Custom,
            self.dimensions(),
        )
    }
}

impl Default for CustomDeviceSpec {
    fn default() -> Self {
        Self {
            width: DEFAULT_CUSTOM_WIDTH,
            height: DEFAULT_CUSTOM_HEIGHT,
        }
    }
}

fn clamp_custom(value: i64) -> u32 {
    value.clamp(CUSTOM_DEVICE_MIN as i64, CUSTOM_DEVICE_MAX as i64) as u32
}

/// Requested display mode for [`ViewportState::select_mode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModeRequest {
    Responsive,
    Device(DeviceSelection),
}

/// Everything a transition reads besides the state itself.
#[derive(Clone, Copy, Debug)]
pub struct TransitionContext<'a> {
    pub catalog: &'a Catalog,
    pub config: &'a ViewConfig,
    pub rect: AvailableRect,
}

impl<'a> TransitionContext<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a ViewConfig, rect: AvailableRect) -> Self {
        Self {
            catalog,
            config,
            rect,
        }
    }

    /// Available rect net of the frame padding.
    pub fn fit_rect(&self) -> AvailableRect {
        self.rect
            .inset(self.config.frame.padding_x, self.config.frame.padding_y)
    }
}

/// Outcome of a transition: the layout to apply, and whether the persisted
/// state changed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub layout: LayoutResult,
    pub changed: bool,
}

/// The viewport simulation state. Mutated only through the transition
/// methods below (and the navigation tracker for the content address).
#[derive(Clone, Debug, PartialEq)]
pub struct ViewportState {
    pub(crate) mode: ViewMode,
    /// Active device class; always `Mobile` or `Tablet`.
    pub(crate) category: DeviceCategory,
    pub(crate) mobile: Option<DeviceSelection>,
    pub(crate) tablet: Option<DeviceSelection>,
    pub(crate) orientation: Orientation,
    pub(crate) zoom_percent: u32,
    pub(crate) manual_zoom_override: bool,
    pub(crate) custom: CustomDeviceSpec,
    pub(crate) content_address: String,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}

impl ViewportState {
    /// Default state: responsive, first preset remembered per category.
    pub fn new(catalog: &Catalog) -> Self {
        let preset = |category| {
            catalog
                .default_for(category)
                .map(|p| DeviceSelection::Preset(p.id.to_string()))
        };
        Self {
            mode: ViewMode::Responsive,
            category: DeviceCategory::Mobile,
            mobile: preset(DeviceCategory::Mobile),
            tablet: preset(DeviceCategory::Tablet),
            orientation: Orientation::Portrait,
            zoom_percent: DEFAULT_ZOOM_PERCENT,
            manual_zoom_override: false,
            custom: CustomDeviceSpec::default(),
            content_address: BLANK_ADDRESS.to_string(),
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn category(&self) -> DeviceCategory {
        self.category
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn zoom_percent(&self) -> u32 {
        self.zoom_percent
    }

    pub fn manual_zoom_override(&self) -> bool {
        self.manual_zoom_override
    }

    pub fn custom_device(&self) -> CustomDeviceSpec {
        self.custom
    }

    pub fn content_address(&self) -> &str {
        &self.content_address
    }

    pub(crate) fn set_content_address(&mut self, address: String) {
        self.content_address = address;
    }

    /// Remembered selection of a category.
    pub fn selection_for(&self, category: DeviceCategory) -> Option<&DeviceSelection> {
        match category {
            DeviceCategory::Mobile => self.mobile.as_ref(),
            DeviceCategory::Tablet => self.tablet.as_ref(),
            DeviceCategory::Custom => None,
        }
    }

    fn selection_slot(&mut self, category: DeviceCategory) -> &mut Option<DeviceSelection> {
        match category {
            DeviceCategory::Tablet => &mut self.tablet,
            _ => &mut self.mobile,
        }
    }

    /// Selection of the active category. Meaningful only in device mode.
    pub fn selected_device(&self) -> Option<&DeviceSelection> {
        self.selection_for(self.category)
    }

    pub fn is_custom_active(&self) -> bool {
        self.mode == ViewMode::Device && self.selected_device().is_some_and(|s| s.is_custom())
    }

    /// The simulated device, or `None` in responsive mode.
    pub fn active_profile(&self, catalog: &Catalog) -> Option<DeviceProfile> {
        if self.mode != ViewMode::Device {
            return None;
        }
        match self.selected_device()? {
            DeviceSelection::Custom => Some(self.custom.profile()),
            DeviceSelection::Preset(id) => catalog.lookup(id).cloned(),
        }
    }

    pub fn layout(&self, ctx: &TransitionContext<'_>) -> LayoutResult {
        layout::compute_layout(self, ctx)
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot::from_state(self)
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    pub fn select_mode(&mut self, ctx: &TransitionContext<'_>, request: ModeRequest) -> Transition {
        match request {
            ModeRequest::Responsive => self.select_responsive(ctx),
            ModeRequest::Device(selection) => self.select_device(ctx, selection),
        }
    }

    /// Switch to responsive mode. Orientation is forced to portrait; a manual
    /// zoom survives the switch.
    pub fn select_responsive(&mut self, ctx: &TransitionContext<'_>) -> Transition {
        self.transition(ctx, |state, ctx| state.enter_responsive(ctx))
    }

    /// Simulate `selection`. Unknown presets fall back to the default of the
    /// active category, then to any preset, then to responsive mode.
    pub fn select_device(
        &mut self,
        ctx: &TransitionContext<'_>,
        selection: DeviceSelection,
    ) -> Transition {
        self.transition(ctx, |state, ctx| {
            match state.resolve_selection(ctx.catalog, selection) {
                Some((category, selection)) => state.enter_device(ctx, category, selection),
                None => {
                    warn!("device catalog is empty, staying responsive");
                    state.enter_responsive(ctx);
                }
            }
        })
    }

    /// Switch to the remembered device of `category` (toolbar buttons).
    pub fn select_category(
        &mut self,
        ctx: &TransitionContext<'_>,
        category: DeviceCategory,
    ) -> Transition {
        if category == DeviceCategory::Custom {
            return self.select_device(ctx, DeviceSelection::Custom);
        }
        self.transition(ctx, |state, ctx| {
            let resolved = match state.selection_for(category).cloned() {
                Some(DeviceSelection::Custom) => Some(DeviceSelection::Custom),
                Some(DeviceSelection::Preset(id)) if ctx.catalog.lookup(&id).is_some() => {
                    Some(DeviceSelection::Preset(id))
                }
                _ => ctx
                    .catalog
                    .default_for(category)
                    .map(|p| DeviceSelection::Preset(p.id.to_string())),
            };
            match resolved {
                Some(selection) => state.enter_device(ctx, category, selection),
                None => {
                    warn!(%category, "no {category} devices in catalog, staying responsive");
                    state.enter_responsive(ctx);
                }
            }
        })
    }

    /// Update the custom device; refits when the custom device is on screen.
    pub fn set_custom_device_size(
        &mut self,
        ctx: &TransitionContext<'_>,
        width: i64,
        height: i64,
    ) -> Transition {
        self.transition(ctx, |state, ctx| {
            state.custom = CustomDeviceSpec::new(width, height);
            if state.is_custom_active() {
                state.refit(ctx);
            }
        })
    }

    pub fn toggle_orientation(&mut self, ctx: &TransitionContext<'_>) -> Transition {
        if self.mode == ViewMode::Responsive {
            return self.unchanged(ctx);
        }
        self.transition(ctx, |state, ctx| {
            state.orientation = state.orientation.toggled();
            state.refit(ctx);
        })
    }

    /// Manual zoom. Device zoom is derived, so this is a no-op there.
    pub fn adjust_zoom(&mut self, ctx: &TransitionContext<'_>, delta_percent: i32) -> Transition {
        if self.mode == ViewMode::Device {
            return self.unchanged(ctx);
        }
        self.transition(ctx, |state, ctx| {
            let target = state.zoom_percent as f64 + delta_percent as f64;
            state.zoom_percent = ctx.config.zoom.normalize(target);
            state.manual_zoom_override = true;
        })
    }

    pub fn zoom_in(&mut self, ctx: &TransitionContext<'_>) -> Transition {
        let step = ctx.config.zoom.step.max(1) as i32;
        self.adjust_zoom(ctx, step)
    }

    pub fn zoom_out(&mut self, ctx: &TransitionContext<'_>) -> Transition {
        let step = ctx.config.zoom.step.max(1) as i32;
        self.adjust_zoom(ctx, -step)
    }

    /// Drop the manual zoom and go back to auto-zoom (responsive only).
    pub fn reset_zoom(&mut self, ctx: &TransitionContext<'_>) -> Transition {
        if self.mode == ViewMode::Device {
            return self.unchanged(ctx);
        }
        self.transition(ctx, |state, ctx| {
            state.manual_zoom_override = false;
            state.zoom_percent = layout::auto_zoom(ctx.rect.width, &ctx.config.zoom);
        })
    }

    /// The panel was resized to `ctx.rect`.
    pub fn on_available_rect_changed(&mut self, ctx: &TransitionContext<'_>) -> Transition {
        self.transition(ctx, |state, ctx| state.rederive_zoom(ctx))
    }

    /// Replace the whole state from a persisted snapshot, then recompute.
    /// Callers must not persist the result.
    pub fn restore_state(
        &mut self,
        ctx: &TransitionContext<'_>,
        snapshot: &ViewSnapshot,
    ) -> Transition {
        self.transition(ctx, |state, ctx| {
            *state = snapshot.validate(ctx.catalog, &ctx.config.zoom);
            state.rederive_zoom(ctx);
        })
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn transition(
        &mut self,
        ctx: &TransitionContext<'_>,
        apply: impl FnOnce(&mut Self, &TransitionContext<'_>),
    ) -> Transition {
        let before = self.clone();
        apply(self, ctx);
        let changed = *self != before;
        if changed {
            debug!(
                mode = %self.mode,
                device = self.selected_device().map(|s| s.id()).unwrap_or("-"),
                orientation = %self.orientation,
                zoom = self.zoom_percent,
                manual = self.manual_zoom_override,
                "viewport state changed"
            );
        }
        Transition {
            layout: self.layout(ctx),
            changed,
        }
    }

    fn unchanged(&self, ctx: &TransitionContext<'_>) -> Transition {
        Transition {
            layout: self.layout(ctx),
            changed: false,
        }
    }

    fn enter_responsive(&mut self, ctx: &TransitionContext<'_>) {
        self.mode = ViewMode::Responsive;
        self.orientation = Orientation::Portrait;
        if !self.manual_zoom_override {
            self.zoom_percent = layout::auto_zoom(ctx.rect.width, &ctx.config.zoom);
        }
    }

    fn enter_device(
        &mut self,
        ctx: &TransitionContext<'_>,
        category: DeviceCategory,
        selection: DeviceSelection,
    ) {
        self.mode = ViewMode::Device;
        self.category = category;
        *self.selection_slot(category) = Some(selection);
        self.refit(ctx);
    }

    /// Zoom according to whichever policy is authoritative right now.
    fn rederive_zoom(&mut self, ctx: &TransitionContext<'_>) {
        match self.mode {
            ViewMode::Device => self.refit(ctx),
            ViewMode::Responsive if !self.manual_zoom_override => {
                self.zoom_percent = layout::auto_zoom(ctx.rect.width, &ctx.config.zoom);
            }
            ViewMode::Responsive => {}
        }
    }

    fn refit(&mut self, ctx: &TransitionContext<'_>) {
        if let Some(profile) = self.active_profile(ctx.catalog) {
            let dims = profile.dimensions(self.orientation);
            self.zoom_percent = layout::fit_zoom(dims, ctx.fit_rect(), &ctx.config.zoom);
        }
    }

    fn resolve_selection(
        &self,
        catalog: &Catalog,
        selection: DeviceSelection,
    ) -> Option<(DeviceCategory, DeviceSelection)> {
        match selection {
            DeviceSelection::Custom => Some((self.category, DeviceSelection::Custom)),
            DeviceSelection::Preset(id) => match catalog.lookup(&id) {
                Some(profile) => {
                    let category = match profile.category {
                        DeviceCategory::Custom => self.category,
                        category => category,
                    };
                    Some((category, DeviceSelection::Preset(id)))
                }
                None => {
                    warn!(
                        device = %id,
                        category = %self.category,
                        "unknown device, using category default"
                    );
                    fallback_device(catalog, self.category)
                }
            },
        }
    }
}

/// Default preset of `category`, or the first mobile/tablet preset at all.
pub(crate) fn fallback_device(
    catalog: &Catalog,
    category: DeviceCategory,
) -> Option<(DeviceCategory, DeviceSelection)> {
    catalog
        .default_for(category)
        .map(|p| (category, p))
        .or_else(|| {
            catalog
                .iter()
                .find(|p| p.category != DeviceCategory::Custom)
                .map(|p| (p.category, p))
        })
        .map(|(category, p)| (category, DeviceSelection::Preset(p.id.to_string())))
}
