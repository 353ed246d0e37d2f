#[allow(dead_code)]
mod common;

use approx::assert_relative_eq;
use viewsim_core::bindings::UserInput;
use viewsim_core::catalog::{Catalog, DeviceCategory};
use viewsim_core::config::{StorageKey, ViewConfig};
use viewsim_core::layout::AvailableRect;
use viewsim_core::messages::{Effect, InboundMessage, OutboundMessage};
use viewsim_core::session::{Session, TimerKey};
use viewsim_core::snapshot::ViewSnapshot;
use viewsim_core::state::{DeviceSelection, Orientation, ViewMode};
use viewsim_core::sync::{MemoryStore, RecordingChannel};

fn select(session: &mut common::TestSession, id: &str) -> Vec<Effect> {
    session.handle_input(UserInput::DeviceSelected { id: id.into() }, 0)
}

fn stored(raw: &str) -> MemoryStore {
    MemoryStore::with_record(&StorageKey::default(), raw)
}

// ---------------------------------------------------------------------------
// Open / close
// ---------------------------------------------------------------------------

#[test]
fn test_open_without_record_uses_defaults() {
    let (session, effects) = Session::open(
        Catalog::builtin().clone(),
        ViewConfig::default(),
        MemoryStore::new(),
        RecordingChannel::new(),
        AvailableRect::new(1280.0, 800.0),
    );
    assert_eq!(session.state().mode(), ViewMode::Responsive);
    assert_eq!(session.state().zoom_percent(), 100);
    assert_eq!(effects, vec![Effect::ApplyLayout(*session.layout())]);
    assert_eq!(session.store().save_count(), 0);
    assert!(session.host().sent.is_empty());
}

#[test]
fn test_open_restores_record_without_persisting() {
    let raw = r#"{
        "version": 2,
        "mode": "device",
        "category": "mobile",
        "mobileDeviceId": "iphonese3",
        "address": "https://example.com"
    }"#;
    let (session, effects) = Session::open(
        Catalog::builtin().clone(),
        ViewConfig::default(),
        stored(raw),
        RecordingChannel::new(),
        AvailableRect::new(300.0, 700.0),
    );
    assert_eq!(session.state().mode(), ViewMode::Device);
    assert_eq!(session.state().zoom_percent(), 80);
    assert_eq!(session.state().content_address(), "https://example.com");
    assert!(effects.contains(&Effect::Load("https://example.com".into())));
    assert!(effects.contains(&Effect::ShowAddress("https://example.com".into())));
    assert_eq!(session.store().save_count(), 0);
    assert!(session.host().sent.is_empty());
}

#[test]
fn test_open_with_legacy_record() {
    let raw = r#"{"activeBreakpoint": "tablet", "selectedTabletDeviceId": "ipadpro13m4"}"#;
    let session = common::open_with_store(stored(raw), 2000.0, 2000.0);
    assert_eq!(session.state().category(), DeviceCategory::Tablet);
    assert_eq!(
        session.state().selected_device(),
        Some(&DeviceSelection::from_id("ipadpro13m4"))
    );
}

#[test]
fn test_open_with_corrupt_record_uses_defaults() {
    let session = common::open_with_store(stored("{corrupt"), 1280.0, 800.0);
    assert_eq!(session.state().mode(), ViewMode::Responsive);
    assert_eq!(session.state().zoom_percent(), 100);
}

#[test]
fn test_close_flushes_state() {
    let mut session = common::open_session(300.0, 700.0);
    select(&mut session, "iphonese3");
    let (store, host) = session.close();
    assert_eq!(store.save_count(), 2);
    assert_eq!(host.sent.len(), 1);

    let reopened = common::open_with_store(store, 300.0, 700.0);
    assert_eq!(reopened.state().mode(), ViewMode::Device);
    assert_eq!(reopened.state().zoom_percent(), 80);
}

// ---------------------------------------------------------------------------
// User input
// ---------------------------------------------------------------------------

#[test]
fn test_device_selection_reports_once() {
    let mut session = common::open_session(300.0, 700.0);
    let effects = select(&mut session, "iphonese3");
    assert_eq!(effects.len(), 1);
    let Effect::ApplyLayout(layout) = &effects[0] else {
        panic!("expected a layout, got {effects:?}");
    };
    assert_relative_eq!(layout.frame_width, 300.0, epsilon = 1e-9);
    assert_relative_eq!(layout.frame_height, 533.6, epsilon = 1e-9);

    assert_eq!(session.store().save_count(), 1);
    let params: Vec<_> = session.host().view_parameters().collect();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].selected_device_id.as_deref(), Some("iphonese3"));
    assert_eq!(params[0].zoom_percent, 80);
}

#[test]
fn test_unchanged_transition_is_not_reported() {
    let mut session = common::open_session(300.0, 700.0);
    select(&mut session, "iphonese3");
    let effects = select(&mut session, "iphonese3");
    assert!(effects.is_empty());
    assert_eq!(session.store().save_count(), 1);
    assert_eq!(session.host().sent.len(), 1);
}

#[test]
fn test_zoom_buttons_in_device_mode_do_nothing() {
    let mut session = common::open_session(300.0, 700.0);
    select(&mut session, "iphonese3");
    for input in [UserInput::ZoomIn, UserInput::ZoomOut, UserInput::ZoomReset] {
        assert!(session.handle_input(input, 0).is_empty());
    }
    assert_eq!(session.state().zoom_percent(), 80);
    assert_eq!(session.store().save_count(), 1);
}

#[test]
fn test_rotate_and_category_buttons() {
    let mut session = common::open_session(2000.0, 2000.0);
    session.handle_input(
        UserInput::CategoryClicked {
            category: DeviceCategory::Tablet,
        },
        0,
    );
    assert_eq!(session.state().mode(), ViewMode::Device);
    session.handle_input(UserInput::RotateClicked, 0);
    assert_eq!(session.state().orientation(), Orientation::Landscape);
    session.handle_input(UserInput::ResponsiveClicked, 0);
    assert_eq!(session.state().orientation(), Orientation::Portrait);
    assert_eq!(session.host().view_parameters().count(), 3);
}

#[test]
fn test_status_label_follows_state() {
    let mut session = common::open_session(300.0, 700.0);
    select(&mut session, "iphonese3");
    assert_eq!(session.status_label(), "375 × 667 (80%)");
}

// ---------------------------------------------------------------------------
// Custom size debouncing
// ---------------------------------------------------------------------------

#[test]
fn test_custom_input_applies_now_and_persists_later() {
    let mut session = common::open_session(1000.0, 1000.0);
    select(&mut session, "custom");
    assert_eq!(session.store().save_count(), 1);

    for (now, raw) in [(0, "400"), (100, "500"), (200, "600")] {
        let effects = session.handle_input(UserInput::CustomWidthInput { raw: raw.into() }, now);
        assert_eq!(effects.len(), 1, "layout must follow every keystroke");
    }
    assert_relative_eq!(session.layout().content_width, 600.0);
    assert_eq!(session.store().save_count(), 1);
    assert_eq!(session.next_deadline(), Some(500));

    assert!(session.tick(499).is_empty());
    assert_eq!(session.store().save_count(), 1);
    session.tick(500);
    assert_eq!(session.store().save_count(), 2);
    let last = session.host().view_parameters().last().unwrap();
    assert_eq!(last.custom_width, 600);

    session.tick(10_000);
    assert_eq!(session.store().save_count(), 2);
}

#[test]
fn test_invalid_custom_input_is_ignored() {
    let mut session = common::open_session(1000.0, 1000.0);
    for raw in ["", "abc", "0", "-20", "12.5"] {
        let effects = session.handle_input(UserInput::CustomHeightInput { raw: raw.into() }, 0);
        assert!(effects.is_empty());
    }
    assert!(!session.is_pending(TimerKey::CustomSize));
    assert_eq!(session.state().custom_device().height(), 640);
}

#[test]
fn test_custom_commit_persists_immediately() {
    let mut session = common::open_session(1000.0, 1000.0);
    session.handle_input(UserInput::CustomWidthInput { raw: "420".into() }, 0);
    assert!(session.is_pending(TimerKey::CustomSize));

    session.handle_input(UserInput::CustomWidthCommit { raw: "420".into() }, 50);
    assert!(!session.is_pending(TimerKey::CustomSize));
    assert_eq!(session.store().save_count(), 1);
    session.tick(1_000);
    assert_eq!(session.store().save_count(), 1);
}

#[test]
fn test_custom_input_is_clamped() {
    let mut session = common::open_session(1000.0, 1000.0);
    session.handle_input(UserInput::CustomWidthCommit { raw: "20".into() }, 0);
    session.handle_input(UserInput::CustomHeightCommit { raw: "99999".into() }, 0);
    assert_eq!(session.state().custom_device().width(), 50);
    assert_eq!(session.state().custom_device().height(), 5000);
}

// ---------------------------------------------------------------------------
// Resize debouncing
// ---------------------------------------------------------------------------

#[test]
fn test_resize_burst_recomputes_once() {
    let mut session = common::open_session(1280.0, 800.0);
    session.handle_input(UserInput::PanelResized { width: 640.0, height: 400.0 }, 0);
    session.handle_input(UserInput::PanelResized { width: 900.0, height: 400.0 }, 50);
    assert_eq!(session.state().zoom_percent(), 100);

    assert!(session.tick(199).is_empty());
    let effects = session.tick(200);
    assert_eq!(effects.len(), 1);
    assert_eq!(session.rect(), AvailableRect::new(900.0, 400.0));
    assert_eq!(session.state().zoom_percent(), 70);
}

#[test]
fn test_set_available_rect_is_immediate() {
    let mut session = common::open_session(1280.0, 800.0);
    session.handle_input(UserInput::PanelResized { width: 320.0, height: 400.0 }, 0);
    session.set_available_rect(AvailableRect::new(640.0, 400.0));
    assert!(!session.is_pending(TimerKey::Resize));
    assert_eq!(session.state().zoom_percent(), 50);
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[test]
fn test_address_bar_navigation() {
    let mut session = common::open_session(1280.0, 800.0);
    let effects = session.handle_input(
        UserInput::AddressSubmitted {
            raw: "example.com".into(),
        },
        0,
    );
    assert_eq!(
        effects,
        vec![
            Effect::Load("https://example.com".into()),
            Effect::ShowAddress("https://example.com".into()),
        ]
    );
    assert_eq!(
        session.host().addresses().collect::<Vec<_>>(),
        ["https://example.com"]
    );
    assert_eq!(session.store().save_count(), 1);
}

#[test]
fn test_initial_blank_address_is_silent() {
    let mut session = common::open_session(1280.0, 800.0);
    let effects = session.handle_message(InboundMessage::SetAddress {
        address: "about:blank".into(),
        is_initial_load: true,
    });
    assert!(effects.is_empty());
    assert!(session.host().sent.is_empty());
    assert_eq!(session.store().save_count(), 0);
}

#[test]
fn test_content_redirect_is_reported() {
    let mut session = common::open_session(1280.0, 800.0);
    session.handle_message(InboundMessage::SetAddress {
        address: "http://example.com".into(),
        is_initial_load: false,
    });
    session.content_loaded(Some("https://example.com/"));
    assert_eq!(session.state().content_address(), "https://example.com/");
    assert_eq!(
        session.host().addresses().collect::<Vec<_>>(),
        ["http://example.com", "https://example.com/"]
    );
}

#[test]
fn test_history_and_reload() {
    let mut session = common::open_session(1280.0, 800.0);
    assert_eq!(session.handle_message(InboundMessage::GoBack), vec![Effect::HistoryBack]);
    assert_eq!(
        session.handle_input(UserInput::ForwardClicked, 0),
        vec![Effect::HistoryForward]
    );
    assert!(session.handle_message(InboundMessage::Reload).is_empty());

    session.handle_input(UserInput::AddressSubmitted { raw: "rust-lang.org".into() }, 0);
    assert_eq!(session.handle_input(UserInput::ReloadClicked, 0), vec![Effect::Reload]);
}

#[test]
fn test_toolbar_messages() {
    let mut session = common::open_session(1280.0, 800.0);
    session.handle_input(UserInput::OpenExternalClicked, 0);
    session.handle_input(UserInput::DevToolsClicked, 0);
    assert_eq!(session.host().sent, vec![OutboundMessage::OpenDevTools]);

    session.handle_input(UserInput::AddressSubmitted { raw: "example.com".into() }, 0);
    session.handle_input(UserInput::OpenExternalClicked, 0);
    assert_eq!(
        session.host().sent.last(),
        Some(&OutboundMessage::OpenExternal {
            address: "https://example.com".into()
        })
    );
}

// ---------------------------------------------------------------------------
// Host messages
// ---------------------------------------------------------------------------

#[test]
fn test_ready_announces_without_persisting() {
    let mut session = common::open_session(1280.0, 800.0);
    session.handle_message(InboundMessage::Ready);
    assert_eq!(session.host().view_parameters().count(), 1);
    assert_eq!(
        session.host().addresses().collect::<Vec<_>>(),
        ["about:blank"]
    );
    assert_eq!(session.store().save_count(), 0);
}

#[test]
fn test_restore_message_is_not_persisted() {
    let mut session = common::open_session(300.0, 700.0);
    let snapshot = ViewSnapshot {
        mode: Some(ViewMode::Device),
        category: Some(DeviceCategory::Mobile),
        mobile_device_id: Some("unknown-id".into()),
        address: Some("https://example.com".into()),
        ..Default::default()
    };
    let effects = session.handle_message(InboundMessage::RestoreState { snapshot });

    assert_eq!(session.state().mode(), ViewMode::Device);
    assert_eq!(
        session.state().selected_device(),
        Some(&DeviceSelection::from_id("iphonese3"))
    );
    assert!(effects.contains(&Effect::Load("https://example.com".into())));
    assert_eq!(session.store().save_count(), 0);
    assert!(session.host().sent.is_empty());

    // The suppression does not swallow the next real change
    session.handle_input(UserInput::RotateClicked, 0);
    assert_eq!(session.store().save_count(), 1);
    assert_eq!(session.host().view_parameters().count(), 1);
}

#[test]
fn test_restore_of_identical_state_does_not_leak_suppression() {
    let mut session = common::open_session(1280.0, 800.0);
    let snapshot = session.state().snapshot();
    session.handle_message(InboundMessage::RestoreState { snapshot });
    assert!(session.host().sent.is_empty());

    session.handle_input(UserInput::ZoomIn, 0);
    assert_eq!(session.host().view_parameters().count(), 1);
}

#[test]
fn test_restore_cancels_pending_timers() {
    let mut session = common::open_session(1000.0, 1000.0);
    session.handle_input(UserInput::CustomWidthInput { raw: "700".into() }, 0);
    session.handle_message(InboundMessage::RestoreState {
        snapshot: ViewSnapshot::default(),
    });
    assert_eq!(session.next_deadline(), None);
    session.tick(1_000);
    assert_eq!(session.store().save_count(), 0);
}

#[test]
fn test_restore_keeps_pending_resize() {
    let mut session = common::open_session(1280.0, 800.0);
    session.handle_input(UserInput::PanelResized { width: 640.0, height: 400.0 }, 0);
    session.handle_message(InboundMessage::RestoreState {
        snapshot: ViewSnapshot::default(),
    });
    assert_eq!(session.rect(), AvailableRect::new(640.0, 400.0));
    assert_eq!(session.state().zoom_percent(), 50);
    assert!(!session.is_pending(TimerKey::Resize));

    session.tick(10_000);
    assert_eq!(session.rect(), AvailableRect::new(640.0, 400.0));
    assert_eq!(session.state().zoom_percent(), 50);
    assert_eq!(session.store().save_count(), 0);
}

#[test]
fn test_restore_message_with_legacy_record() {
    let mut session = common::open_session(1280.0, 800.0);
    let message: InboundMessage = serde_json::from_value(serde_json::json!({
        "type": "restoreState",
        "snapshot": {
            "activeBreakpoint": "tablet",
            "url": "https://example.com",
            "orientation": "landscape"
        }
    }))
    .unwrap();
    let effects = session.handle_message(message);

    assert_eq!(session.state().mode(), ViewMode::Device);
    assert_eq!(session.state().category(), DeviceCategory::Tablet);
    assert_eq!(session.state().orientation(), Orientation::Landscape);
    assert_eq!(session.state().content_address(), "https://example.com");
    assert!(effects.contains(&Effect::Load("https://example.com".into())));
    assert_eq!(session.store().save_count(), 0);
}

#[test]
fn test_detached_host_does_not_break_session() {
    let (mut session, _) = Session::open(
        Catalog::builtin().clone(),
        ViewConfig::default(),
        MemoryStore::new().fail_saves(),
        RecordingChannel::detached(),
        AvailableRect::new(300.0, 700.0),
    );
    select(&mut session, "iphonese3");
    session.handle_message(InboundMessage::Ready);
    assert_eq!(session.state().zoom_percent(), 80);
}
