//! View orchestration for the gridview engine.
//!
//! The orchestrator is the single context object the presentation layer
//! talks to: it selects variables and axes, holds the current index
//! vector, and drives the read -> overlay-burn-in -> resample -> publish
//! pipeline. State transitions, the single-flight redraw guard, and the
//! rendered-frame cache all live here.

pub mod config;
pub mod orchestrator;
pub mod pixels;
pub mod presenter;
pub mod view;

pub use config::ViewConfig;
pub use orchestrator::{Orchestrator, OverlaySource, ViewState};
pub use pixels::{map_pixels, widen_degenerate};
pub use presenter::{LabelKind, Presenter, RecordingPresenter};
pub use view::{step_magnification, AxisRole, ChangeUnit, DataStatus, PlotHistory, View};
