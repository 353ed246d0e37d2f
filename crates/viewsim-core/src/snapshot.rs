//! Persisted form of [`ViewportState`] and the single place where stored
//! values are validated.
//!
//! Every field is optional so that partial or older records still load;
//! [`ViewSnapshot::validate`] applies the fallback rules once instead of at
//! each read site.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::catalog::{Catalog, DeviceCategory};
use crate::config::ZoomPolicy;
use crate::consts::{BLANK_ADDRESS, DEFAULT_ZOOM_PERCENT, SNAPSHOT_VERSION};
use crate::error::Result;
use crate::state::{
    fallback_device, CustomDeviceSpec, DeviceSelection, Orientation, ViewMode, ViewportState,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub mode: Option<ViewMode>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub category: Option<DeviceCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tablet_device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub orientation: Option<Orientation>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub zoom_percent: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub manual_zoom_override: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub custom_width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub custom_height: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ViewSnapshot {
    /// Full snapshot of `state`, every field present.
    pub fn from_state(state: &ViewportState) -> Self {
        Self {
            version: Some(SNAPSHOT_VERSION),
            mode: Some(state.mode),
            category: Some(state.category),
            mobile_device_id: state.mobile.as_ref().map(|s| s.id().to_string()),
            tablet_device_id: state.tablet.as_ref().map(|s| s.id().to_string()),
            orientation: Some(state.orientation),
            zoom_percent: Some(state.zoom_percent as i64),
            manual_zoom_override: Some(state.manual_zoom_override),
            custom_width: Some(state.custom.width() as i64),
            custom_height: Some(state.custom.height() as i64),
            address: Some(state.content_address.clone()),
        }
    }

    /// Build a state from this snapshot, substituting defaults for absent
    /// fields and fallbacks for invalid ones. Never fails.
    ///
    /// Zoom is taken as stored (clamped); the caller re-derives it when the
    /// mode makes it automatic.
    pub fn validate(&self, catalog: &Catalog, policy: &ZoomPolicy) -> ViewportState {
        let defaults = ViewportState::new(catalog);
        if self.version.is_some_and(|v| v > SNAPSHOT_VERSION) {
            warn!(
                version = self.version,
                supported = SNAPSHOT_VERSION,
                "snapshot written by a newer format, using defaults"
            );
            return defaults;
        }

        let category = match self.category {
            Some(DeviceCategory::Tablet) => DeviceCategory::Tablet,
            _ => DeviceCategory::Mobile,
        };
        let mobile = validate_selection(catalog, DeviceCategory::Mobile, &self.mobile_device_id);
        let tablet = validate_selection(catalog, DeviceCategory::Tablet, &self.tablet_device_id);

        let mut state = ViewportState {
            mode: self.mode.unwrap_or_default(),
            category,
            mobile,
            tablet,
            orientation: self.orientation.unwrap_or_default(),
            zoom_percent: self
                .zoom_percent
                .map(|z| policy.normalize(z as f64))
                .unwrap_or(DEFAULT_ZOOM_PERCENT),
            manual_zoom_override: self.manual_zoom_override.unwrap_or(false),
            custom: CustomDeviceSpec::new(
                self.custom_width.unwrap_or(defaults.custom.width() as i64),
                self.custom_height.unwrap_or(defaults.custom.height() as i64),
            ),
            content_address: self
                .address
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .unwrap_or(BLANK_ADDRESS)
                .to_string(),
        };

        if state.mode == ViewMode::Device && state.selected_device().is_none() {
            match fallback_device(catalog, state.category) {
                Some((category, selection)) => {
                    warn!(%category, "no device for stored category, using catalog default");
                    state.category = category;
                    match category {
                        DeviceCategory::Tablet => state.tablet = Some(selection),
                        _ => state.mobile = Some(selection),
                    }
                }
                None => {
                    warn!("device catalog is empty, restoring responsive mode");
                    state.mode = ViewMode::Responsive;
                }
            }
        }
        if state.mode == ViewMode::Responsive {
            state.orientation = Orientation::Portrait;
        }
        state
    }
}

fn validate_selection(
    catalog: &Catalog,
    category: DeviceCategory,
    stored: &Option<String>,
) -> Option<DeviceSelection> {
    let fallback = || {
        catalog
            .default_for(category)
            .map(|p| DeviceSelection::Preset(p.id.to_string()))
    };
    match stored.as_deref() {
        None | Some("") => fallback(),
        Some(id) => match DeviceSelection::from_id(id) {
            DeviceSelection::Custom => Some(DeviceSelection::Custom),
            DeviceSelection::Preset(id) => {
                if catalog
                    .lookup(&id)
                    .is_some_and(|p| p.category == category)
                {
                    Some(DeviceSelection::Preset(id))
                } else {
                    warn!(device = %id, %category, "unknown stored device, using category default");
                    fallback()
                }
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Record layout written before snapshots carried a version.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacySnapshot {
    url: Option<String>,
    zoom: Option<f64>,
    active_breakpoint: Option<String>,
    selected_mobile_device_id: Option<String>,
    selected_tablet_device_id: Option<String>,
    orientation: Option<String>,
    user_has_manually_zoomed_responsive: Option<bool>,
    custom_device_width: Option<f64>,
    custom_device_height: Option<f64>,
}

impl LegacySnapshot {
    fn migrate(self) -> ViewSnapshot {
        let (mode, category) = match self.active_breakpoint.as_deref() {
            Some("mobile") => (ViewMode::Device, Some(DeviceCategory::Mobile)),
            Some("tablet") => (ViewMode::Device, Some(DeviceCategory::Tablet)),
            _ => (ViewMode::Responsive, None),
        };
        let orientation = self.orientation.as_deref().map(|o| match o {
            "landscape" => Orientation::Landscape,
            _ => Orientation::Portrait,
        });
        let non_empty = |id: Option<String>| id.filter(|id| !id.is_empty());
        ViewSnapshot {
            version: None,
            mode: Some(mode),
            category,
            mobile_device_id: non_empty(self.selected_mobile_device_id),
            tablet_device_id: non_empty(self.selected_tablet_device_id),
            orientation,
            zoom_percent: self.zoom.filter(|z| z.is_finite()).map(|z| z.round() as i64),
            manual_zoom_override: self.user_has_manually_zoomed_responsive,
            custom_width: self.custom_device_width.map(|w| w.round() as i64),
            custom_height: self.custom_device_height.map(|h| h.round() as i64),
            address: self.url,
        }
    }
}

/// Read an optional field, treating a value of the wrong shape as absent.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match T::deserialize(&v) {
        Ok(field) => Some(field),
        Err(err) => {
            debug!(value = %v, %err, "ignoring unreadable snapshot field");
            None
        }
    }))
}

/// Deserialize a snapshot embedded in another message through [`decode_value`].
pub fn deserialize_record<'de, D>(deserializer: D) -> std::result::Result<ViewSnapshot, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    decode_value(value).map_err(serde::de::Error::custom)
}

pub fn encode(snapshot: &ViewSnapshot) -> Result<String> {
    Ok(serde_json::to_string(snapshot)?)
}

pub fn decode(raw: &str) -> Result<ViewSnapshot> {
    decode_value(serde_json::from_str(raw)?)
}

/// Decode a stored record, migrating the unversioned layout.
pub fn decode_value(value: serde_json::Value) -> Result<ViewSnapshot> {
    if value.get("version").is_some() {
        Ok(serde_json::from_value(value)?)
    } else {
        let legacy: LegacySnapshot = serde_json::from_value(value)?;
        Ok(legacy.migrate())
    }
}
