use serde::{Deserialize, Serialize};

use crate::catalog::DeviceCategory;
use crate::layout::LayoutResult;
use crate::snapshot::{self, ViewSnapshot};
use crate::state::{DeviceSelection, Orientation, ViewMode, ViewportState};

/// Messages the host sends to the view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum InboundMessage {
    /// The host (re)attached and wants the current state.
    Ready,
    SetAddress {
        address: String,
        #[serde(default)]
        is_initial_load: bool,
    },
    GoBack,
    GoForward,
    Reload,
    RestoreState {
        #[serde(deserialize_with = "snapshot::deserialize_record")]
        snapshot: ViewSnapshot,
    },
}

/// Messages the view sends to the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum OutboundMessage {
    AddressChanged { address: String },
    ViewParametersChanged(ViewParameters),
    OpenExternal { address: String },
    OpenDevTools,
}

/// View parameters reported to the host after every user-caused change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewParameters {
    pub mode: ViewMode,
    /// Device of the active category (`"custom"` for the custom device).
    pub selected_device_id: Option<String>,
    pub category: DeviceCategory,
    pub mobile_device_id: Option<String>,
    pub tablet_device_id: Option<String>,
    pub orientation: Orientation,
    pub zoom_percent: u32,
    pub manual_zoom_override: bool,
    pub custom_width: u32,
    pub custom_height: u32,
}

impl ViewParameters {
    pub fn from_state(state: &ViewportState) -> Self {
        let id = |s: Option<&DeviceSelection>| s.map(|s| s.id().to_string());
        Self {
            mode: state.mode(),
            selected_device_id: id(state.selected_device()),
            category: state.category(),
            mobile_device_id: id(state.selection_for(DeviceCategory::Mobile)),
            tablet_device_id: id(state.selection_for(DeviceCategory::Tablet)),
            orientation: state.orientation(),
            zoom_percent: state.zoom_percent(),
            manual_zoom_override: state.manual_zoom_override(),
            custom_width: state.custom_device().width(),
            custom_height: state.custom_device().height(),
        }
    }
}

/// Instructions for the layer that renders the frame and hosts the content.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    ApplyLayout(LayoutResult),
    /// Point the content frame at a new address.
    Load(String),
    /// Text the address bar should show.
    ShowAddress(String),
    HistoryBack,
    HistoryForward,
    Reload,
}
