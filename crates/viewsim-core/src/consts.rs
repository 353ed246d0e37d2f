/// Lowest zoom percentage reachable by any policy.
pub const MIN_ZOOM_PERCENT: u32 = 10;

/// Highest zoom percentage reachable by manual zoom.
pub const MAX_ZOOM_PERCENT: u32 = 300;

/// Zoom values are always a multiple of this step.
pub const DEFAULT_ZOOM_STEP: u32 = 10;

/// Zoom applied when nothing else decides it.
pub const DEFAULT_ZOOM_PERCENT: u32 = 100;

/// Floor for responsive auto-zoom.
pub const MIN_AUTO_ZOOM_PERCENT: u32 = 25;

/// Floor for device fit-to-space zoom.
pub const MIN_FIT_ZOOM_PERCENT: u32 = 10;

/// Desktop canvas width emulated by responsive auto-zoom.
pub const REFERENCE_DESKTOP_WIDTH: u32 = 1280;

/// Auto-zoom used while the panel width is still unknown.
pub const FALLBACK_AUTO_ZOOM_PERCENT: u32 = 50;

/// Fit zoom used when the device or the panel has no usable area.
pub const DEFAULT_FIT_ZOOM_PERCENT: u32 = 100;

/// Custom device dimensions are clamped to `[CUSTOM_DEVICE_MIN, CUSTOM_DEVICE_MAX]`.
pub const CUSTOM_DEVICE_MIN: u32 = 50;
pub const CUSTOM_DEVICE_MAX: u32 = 5000;

pub const DEFAULT_CUSTOM_WIDTH: u32 = 360;
pub const DEFAULT_CUSTOM_HEIGHT: u32 = 640;

/// Corner radius (px) of the simulated device frame.
pub const DEVICE_FRAME_RADIUS: f64 = 8.0;

/// Quiet period before a burst of panel resizes is applied.
pub const RESIZE_DEBOUNCE_MS: u64 = 150;

/// Quiet period before custom-size keystrokes are persisted.
pub const INPUT_DEBOUNCE_MS: u64 = 300;

/// Address of the empty page.
pub const BLANK_ADDRESS: &str = "about:blank";

/// Query prefix used when the address bar input is not an address.
pub const SEARCH_URL_PREFIX: &str = "https://www.google.com/search?q=";

/// Sentinel device id selecting the custom device.
pub const CUSTOM_DEVICE_ID: &str = "custom";

/// Current persisted snapshot layout. Records without a version are the
/// untagged layout written before versioning existed.
pub const SNAPSHOT_VERSION: u32 = 2;

/// Key under which one view instance stores its snapshot.
pub const DEFAULT_STORAGE_KEY: &str = "webviewState:webBrowserPreviewView";

/// Tolerance used when flooring scale factors to whole percentages.
pub const EPSILON: f64 = 1e-9;
