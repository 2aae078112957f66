//! Window manager and session controller for the retro desktop.
//!
//! The crate is layered leaves-first: [`model`] and [`config`] hold plain data,
//! [`window_manager`] computes geometry, [`reducer`] is the lifecycle state machine,
//! [`persistence`] and [`sound`] execute effects, and [`session`] ties them together behind
//! the capability API hosted apps see. [`runtime_context`] mounts a session in a Leptos tree.

pub mod boot;
pub mod config;
pub mod host;
pub mod icons;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod registry;
pub mod runtime_context;
pub mod session;
pub mod sound;
pub mod window_manager;

pub use boot::BootFlags;
pub use config::LayoutConfig;
pub use host::DesktopHostContext;
pub use model::*;
pub use reducer::{reduce_desktop, DesktopAction, DesktopEnv, ReducerError, RuntimeEffect};
pub use registry::{RegistryError, StartMenuEntry, WindowRegistry};
pub use runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};
pub use session::DesktopSession;
pub use sound::{SoundCue, SoundSystem};
