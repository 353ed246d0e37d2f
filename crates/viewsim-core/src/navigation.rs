use tracing::debug;

use crate::config::NavigationConfig;
use crate::state::ViewportState;

/// Who asked for a navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationOrigin {
    /// Address bar, toolbar or an explicit host request. Updates the
    /// authoritative address.
    UserOrInternal,
    /// Replaying a stored address on load or restore. Only drives the frame.
    Initial,
}

impl NavigationOrigin {
    pub fn from_initial_load(is_initial_load: bool) -> Self {
        if is_initial_load {
            Self::Initial
        } else {
            Self::UserOrInternal
        }
    }
}

/// What a navigation asks of the frame and the host.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationOutcome {
    /// Address the content frame must load, when it differs from the current one.
    pub load: Option<String>,
    /// Text for the address bar.
    pub shown: Option<String>,
    /// The authoritative content address changed and must be reported.
    pub address_changed: bool,
}

fn has_known_scheme(address: &str) -> bool {
    let lower = address.to_ascii_lowercase();
    ["http:", "https:", "about:", "file:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}

/// Turn address bar input into a loadable address.
///
/// Known schemes pass through; host-like input gets `https://`; anything
/// else becomes a search query. Returns an empty string for blank input.
pub fn normalize(raw: &str, config: &NavigationConfig) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || has_known_scheme(trimmed) {
        return trimmed.to_string();
    }
    if trimmed.contains('.') || trimmed.contains(':') || trimmed.starts_with("localhost") {
        format!("https://{trimmed}")
    } else {
        format!("{}{}", config.search_url, urlencoding::encode(trimmed))
    }
}

/// Tracks what the content frame shows versus the authoritative address kept
/// in [`ViewportState`].
#[derive(Clone, Debug)]
pub struct NavigationTracker {
    config: NavigationConfig,
    /// Address last handed to the content frame.
    frame_address: String,
}

impl NavigationTracker {
    pub fn new(config: NavigationConfig) -> Self {
        let frame_address = config.blank_address.clone();
        Self {
            config,
            frame_address,
        }
    }

    pub fn frame_address(&self) -> &str {
        &self.frame_address
    }

    pub fn is_blank(&self, address: &str) -> bool {
        address.is_empty() || address == self.config.blank_address
    }

    /// Reload makes no sense on the blank page.
    pub fn can_reload(&self, state: &ViewportState) -> bool {
        !self.is_blank(state.content_address()) && !self.is_blank(&self.frame_address)
    }

    pub fn navigate(
        &mut self,
        state: &mut ViewportState,
        raw: &str,
        origin: NavigationOrigin,
    ) -> NavigationOutcome {
        let address = normalize(raw, &self.config);
        if address.is_empty() {
            return NavigationOutcome::default();
        }
        if address == self.config.blank_address
            && self.frame_address == self.config.blank_address
            && origin != NavigationOrigin::UserOrInternal
        {
            return NavigationOutcome::default();
        }

        let mut outcome = NavigationOutcome {
            shown: Some(address.clone()),
            ..Default::default()
        };
        if self.frame_address != address {
            self.frame_address = address.clone();
            outcome.load = Some(address.clone());
        }
        if origin == NavigationOrigin::UserOrInternal && state.content_address() != address {
            debug!(%address, "content address changed by navigation");
            state.set_content_address(address);
            outcome.address_changed = true;
        }
        outcome
    }

    /// Reconcile with the address the content actually ended up at.
    ///
    /// `actual` is `None` when the content's location cannot be read
    /// (cross-origin); the last requested address stands in for it.
    pub fn content_loaded(
        &mut self,
        state: &mut ViewportState,
        actual: Option<&str>,
    ) -> NavigationOutcome {
        let resolved = match actual {
            Some(href) if !self.is_blank(href) => href.to_string(),
            _ if self.frame_address.is_empty() => self.config.blank_address.clone(),
            _ => self.frame_address.clone(),
        };

        let mut outcome = NavigationOutcome {
            shown: Some(resolved.clone()),
            ..Default::default()
        };
        if state.content_address() != resolved && !self.is_blank(&resolved) {
            debug!(address = %resolved, "content settled on a different address");
            state.set_content_address(resolved);
            outcome.address_changed = true;
        }
        outcome
    }
}
