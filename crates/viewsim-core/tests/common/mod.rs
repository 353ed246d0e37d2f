use viewsim_core::catalog::{Catalog, DeviceCategory, DeviceProfile, Dimensions};
use viewsim_core::config::ViewConfig;
use viewsim_core::layout::AvailableRect;
use viewsim_core::session::Session;
use viewsim_core::state::TransitionContext;
use viewsim_core::sync::{MemoryStore, RecordingChannel};

pub type TestSession = Session<MemoryStore, RecordingChannel>;

/// Transition context over the builtin catalog and default config.
pub fn ctx(config: &ViewConfig, width: f64, height: f64) -> TransitionContext<'_> {
    TransitionContext::new(Catalog::builtin(), config, AvailableRect::new(width, height))
}

/// Catalog with one mobile and one tablet device.
pub fn small_catalog() -> Catalog {
    Catalog::new(vec![
        DeviceProfile::new(
            "phone",
            "Test Phone",
            DeviceCategory::Mobile,
            Dimensions::new(400, 800),
        ),
        DeviceProfile::new(
            "slate",
            "Test Slate",
            DeviceCategory::Tablet,
            Dimensions::new(800, 1200),
        ),
    ])
}

/// Session over the builtin catalog with an empty store.
pub fn open_session(width: f64, height: f64) -> TestSession {
    open_with_store(MemoryStore::new(), width, height)
}

pub fn open_with_store(store: MemoryStore, width: f64, height: f64) -> TestSession {
    let (session, _) = Session::open(
        Catalog::builtin().clone(),
        ViewConfig::default(),
        store,
        RecordingChannel::new(),
        AvailableRect::new(width, height),
    );
    session
}
