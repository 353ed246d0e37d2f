use serde::{Deserialize, Serialize};

use crate::catalog::DeviceCategory;

/// Toolbar and panel events, already decoupled from the widgets that raise
/// them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum UserInput {
    ResponsiveClicked,
    CategoryClicked { category: DeviceCategory },
    DeviceSelected { id: String },
    RotateClicked,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    /// Keystroke in the custom width field.
    CustomWidthInput { raw: String },
    CustomHeightInput { raw: String },
    /// The custom width field lost focus or Enter was pressed.
    CustomWidthCommit { raw: String },
    CustomHeightCommit { raw: String },
    AddressSubmitted { raw: String },
    BackClicked,
    ForwardClicked,
    ReloadClicked,
    DevToolsClicked,
    OpenExternalClicked,
    PanelResized { width: f64, height: f64 },
}

impl UserInput {
    /// Map a toolbar control id and its current value to an input. A
    /// `:change` suffix marks the commit event of a text field; clicking the
    /// zoom readout resets the zoom.
    ///
    /// Returns `None` for ids that are not bound to anything.
    pub fn from_control(control: &str, value: &str) -> Option<Self> {
        let raw = value.to_string();
        let input = match control {
            "deviceResponsive" => Self::ResponsiveClicked,
            "deviceMobile" => Self::CategoryClicked {
                category: DeviceCategory::Mobile,
            },
            "deviceTablet" => Self::CategoryClicked {
                category: DeviceCategory::Tablet,
            },
            "specificDeviceSelect" => Self::DeviceSelected { id: raw },
            "rotateDevice" => Self::RotateClicked,
            "zoomIn" => Self::ZoomIn,
            "zoomOut" => Self::ZoomOut,
            "zoomLevel" => Self::ZoomReset,
            "customDeviceWidth" => Self::CustomWidthInput { raw },
            "customDeviceHeight" => Self::CustomHeightInput { raw },
            "customDeviceWidth:change" => Self::CustomWidthCommit { raw },
            "customDeviceHeight:change" => Self::CustomHeightCommit { raw },
            "urlInput" => Self::AddressSubmitted { raw },
            "backButton" => Self::BackClicked,
            "forwardButton" => Self::ForwardClicked,
            "reloadButton" => Self::ReloadClicked,
            "devToolsButton" => Self::DevToolsClicked,
            "openExternal" => Self::OpenExternalClicked,
            _ => return None,
        };
        Some(input)
    }
}

/// Parse a custom dimension field. Anything that is not a positive integer
/// is ignored by the caller; range clamping happens in the state.
pub fn parse_dimension(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|v| *v > 0)
}
