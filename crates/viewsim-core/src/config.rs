use serde::{Deserialize, Serialize};

use crate::consts::{
    BLANK_ADDRESS, DEFAULT_FIT_ZOOM_PERCENT, DEFAULT_STORAGE_KEY, DEFAULT_ZOOM_PERCENT,
    DEFAULT_ZOOM_STEP, DEVICE_FRAME_RADIUS, FALLBACK_AUTO_ZOOM_PERCENT, INPUT_DEBOUNCE_MS,
    MAX_ZOOM_PERCENT, MIN_AUTO_ZOOM_PERCENT, MIN_FIT_ZOOM_PERCENT, MIN_ZOOM_PERCENT,
    REFERENCE_DESKTOP_WIDTH, RESIZE_DEBOUNCE_MS, SEARCH_URL_PREFIX,
};

/// All tunables of a view session. Every section falls back to its defaults
/// when absent from a config file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub storage_key: StorageKey,
    pub zoom: ZoomPolicy,
    pub frame: FrameConfig,
    pub timing: TimingConfig,
    pub navigation: NavigationConfig,
}

/// Persistence key of one logical view instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(pub String);

impl Default for StorageKey {
    fn default() -> Self {
        Self(DEFAULT_STORAGE_KEY.to_string())
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Zoom bounds, step and the constants of both zoom-derivation policies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomPolicy {
    /// Every zoom value is a multiple of this step (5 and 10 are both in use).
    pub step: u32,
    pub min: u32,
    pub max: u32,
    /// Floor of responsive auto-zoom.
    pub min_auto: u32,
    /// Floor of device fit-to-space zoom.
    pub min_fit: u32,
    /// Desktop width emulated by responsive auto-zoom.
    pub reference_width: u32,
    /// Auto-zoom used while the panel width is unknown (zero or negative).
    pub fallback_auto: u32,
    /// Fit zoom used for degenerate device or panel dimensions.
    pub default_fit: u32,
}

impl Default for ZoomPolicy {
    fn default() -> Self {
        Self {
            step: DEFAULT_ZOOM_STEP,
            min: MIN_ZOOM_PERCENT,
            max: MAX_ZOOM_PERCENT,
            min_auto: MIN_AUTO_ZOOM_PERCENT,
            min_fit: MIN_FIT_ZOOM_PERCENT,
            reference_width: REFERENCE_DESKTOP_WIDTH,
            fallback_auto: FALLBACK_AUTO_ZOOM_PERCENT,
            default_fit: DEFAULT_FIT_ZOOM_PERCENT,
        }
    }
}

impl ZoomPolicy {
    fn step(&self) -> u32 {
        self.step.max(1)
    }

    /// Smallest multiple of the step that is `>= min`.
    pub fn lowest(&self) -> u32 {
        let step = self.step();
        self.min.div_ceil(step) * step
    }

    /// Largest multiple of the step that is `<= max`.
    pub fn highest(&self) -> u32 {
        let step = self.step();
        (self.max / step) * step
    }

    /// Clamp an arbitrary percentage into `[min, max]` and round it to the
    /// nearest step. Never rejects input.
    pub fn normalize(&self, percent: f64) -> u32 {
        let lowest = self.lowest() as f64;
        let highest = (self.highest() as f64).max(lowest);
        if !percent.is_finite() {
            return self.normalize(DEFAULT_ZOOM_PERCENT as f64);
        }
        let step = self.step() as f64;
        let bounded = percent.round().max(self.min as f64).min(self.max as f64);
        let snapped = (bounded / step).round() * step;
        snapped.max(lowest).min(highest) as u32
    }

    /// Round down to a multiple of the step (used where rounding up would
    /// overflow the available space).
    pub fn floor_to_step(&self, percent: u32) -> u32 {
        let step = self.step();
        (percent / step) * step
    }
}

/// Appearance of the simulated device frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub corner_radius: f64,
    /// Horizontal padding (px) around the frame, excluded from fit-to-space.
    pub padding_x: f64,
    /// Vertical padding (px) around the frame, excluded from fit-to-space.
    pub padding_y: f64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            corner_radius: DEVICE_FRAME_RADIUS,
            padding_x: 0.0,
            padding_y: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub resize_debounce_ms: u64,
    pub input_debounce_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            input_debounce_ms: INPUT_DEBOUNCE_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Prefix a percent-encoded search query is appended to.
    pub search_url: String,
    pub blank_address: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            search_url: SEARCH_URL_PREFIX.to_string(),
            blank_address: BLANK_ADDRESS.to_string(),
        }
    }
}
