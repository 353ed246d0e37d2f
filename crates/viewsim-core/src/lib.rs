pub mod bindings;
pub mod catalog;
pub mod config;
pub mod consts;
pub mod debounce;
pub mod error;
pub mod layout;
pub mod messages;
pub mod navigation;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod sync;
