#![cfg_attr(docsrs, feature(doc_cfg))]
//! Library crate providing the Whackabot game core.
//!
//! Robots pop up on a grid, bob in place and die when clicked; a countdown
//! restarts the round when it runs out. The core modules are plain Rust
//! driven by explicit timestamps; [`WhackPlugin`] runs them inside a Bevy
//! app, and the `render` feature adds a windowed 3D presentation.
pub mod animation;
pub mod constants;
pub mod dispatch;
pub mod hud;
pub mod lifecycle;
pub mod logging;
pub mod picking;
pub mod plugin;
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub mod presentation;
pub mod registry;
pub mod robot;
pub mod round;
pub mod session;
pub mod settings;

// Re-export commonly used items
pub use dispatch::{ClickOutcome, HitTestDispatcher, ScreenClick};
pub use hud::{Controls, HudEvent, HudText};
pub use lifecycle::{Lifecycle, LifecycleTimings, Transition};
pub use logging::init as init_logging;
pub use picking::{CameraRig, PickTarget, RayHit, Raycaster, SceneRaycaster};
pub use plugin::{
    ClickResolved, GameClock, HudChanged, PlayRequested, PointerClick, ResetRequested,
    RobotPose, RobotTag, RobotVisible, SceneChanged, SessionError, WhackPlugin,
};
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub use presentation::PresentationPlugin;
pub use registry::{RegistryError, RobotRegistry, SceneEvent};
pub use robot::{Millis, Pose, Robot, RobotId, RobotState};
pub use round::{RoundController, RoundTick};
pub use session::{FrameReport, GameSession, Phase, RobotView};
pub use settings::{GameSettings, SettingsError};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use whackabot::prelude::*;
    //! ```

    pub use crate::GameSession;
    pub use crate::GameSettings;
    pub use crate::PlayRequested;
    pub use crate::PointerClick;
    pub use crate::RobotState;
    pub use crate::WhackPlugin;
}
