use serde::{Deserialize, Serialize};

use crate::catalog::Dimensions;
use crate::config::ZoomPolicy;
use crate::consts::EPSILON;
use crate::state::{TransitionContext, ViewMode, ViewportState};

/// Space the panel currently offers to the simulated viewport, in px.
/// Zero or negative sizes are legal (hidden or collapsing panel).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailableRect {
    pub width: f64,
    pub height: f64,
}

impl AvailableRect {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either side has no usable area (also for NaN).
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn inset(&self, horizontal: f64, vertical: f64) -> Self {
        Self::new(self.width - horizontal, self.height - vertical)
    }
}

/// Pixel sizes and scale to apply to the frame and the embedded content.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    pub frame_width: f64,
    pub frame_height: f64,
    /// Visual transform applied to the content (`zoom / 100`).
    pub content_scale: f64,
    pub content_width: f64,
    pub content_height: f64,
    pub frame_corner_radius: f64,
}

impl LayoutResult {
    /// Zero-sized layout used when the panel has no usable area.
    pub fn empty(content_scale: f64) -> Self {
        Self {
            frame_width: 0.0,
            frame_height: 0.0,
            content_scale: if content_scale > 0.0 { content_scale } else { 1.0 },
            content_width: 0.0,
            content_height: 0.0,
            frame_corner_radius: 0.0,
        }
    }

    /// Content size as a percentage of the frame (`100 / scale`).
    pub fn content_percent(&self) -> f64 {
        100.0 / self.content_scale
    }
}

/// Responsive auto-zoom: emulate a `reference_width` desktop canvas shrunk
/// into the panel, never magnified past 100%.
pub fn auto_zoom(available_width: f64, policy: &ZoomPolicy) -> u32 {
    if !(available_width > 0.0) || policy.reference_width == 0 {
        return policy.normalize(policy.fallback_auto as f64);
    }
    let raw = (available_width / policy.reference_width as f64 * 100.0).round();
    let ceiling = 100.0_f64.max(policy.min_auto as f64);
    policy.normalize(raw.max(policy.min_auto as f64).min(ceiling))
}

/// Scale that fits `device` into `available` without upscaling.
/// `None` when either side has no area.
pub fn fit_scale(device: Dimensions, available: AvailableRect) -> Option<f64> {
    if device.is_degenerate() || available.is_degenerate() {
        return None;
    }
    let scale_x = available.width / device.width as f64;
    let scale_y = available.height / device.height as f64;
    Some(scale_x.min(scale_y).min(1.0))
}

/// Device fit-to-space zoom, floored to the step so the scaled frame never
/// overflows the available rect.
pub fn fit_zoom(device: Dimensions, available: AvailableRect, policy: &ZoomPolicy) -> u32 {
    let Some(scale) = fit_scale(device, available) else {
        return policy.normalize(policy.default_fit as f64);
    };
    let percent = (scale * 100.0 + EPSILON).floor().max(0.0) as u32;
    let floored = policy.floor_to_step(percent.min(100)).max(policy.min_fit);
    policy.normalize(floored as f64)
}

pub fn responsive_layout(rect: AvailableRect, scale: f64) -> LayoutResult {
    if rect.is_degenerate() || !(scale > 0.0) {
        return LayoutResult::empty(scale);
    }
    LayoutResult {
        frame_width: rect.width,
        frame_height: rect.height,
        content_scale: scale,
        content_width: rect.width / scale,
        content_height: rect.height / scale,
        frame_corner_radius: 0.0,
    }
}

pub fn device_layout(device: Dimensions, scale: f64, corner_radius: f64) -> LayoutResult {
    LayoutResult {
        frame_width: device.width as f64 * scale,
        frame_height: device.height as f64 * scale,
        content_scale: scale,
        content_width: device.width as f64,
        content_height: device.height as f64,
        frame_corner_radius: corner_radius,
    }
}

pub fn compute_layout(state: &ViewportState, ctx: &TransitionContext<'_>) -> LayoutResult {
    let scale = state.zoom_percent() as f64 / 100.0;
    match state.active_profile(ctx.catalog) {
        Some(profile) => device_layout(
            profile.dimensions(state.orientation()),
            scale,
            ctx.config.frame.corner_radius,
        ),
        None => responsive_layout(ctx.rect, scale),
    }
}

/// Size readout shown next to the device picker, e.g. `"375 × 667 (80%)"`.
pub fn status_label(state: &ViewportState, layout: &LayoutResult) -> String {
    let zoom = state.zoom_percent();
    match state.mode() {
        ViewMode::Device if state.is_custom_active() => format!("({zoom}%)"),
        _ => format!(
            "{} × {} ({zoom}%)",
            layout.content_width.round() as i64,
            layout.content_height.round() as i64
        ),
    }
}
