#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod animation;
pub mod errors;
pub mod renderer;
pub mod scene;

pub use animation::{AnimationSystem, Animator, Orbit, Spin, SpinAxis};
pub use errors::{MirageError, Result};
pub use renderer::{FrameReport, FrameTarget, Renderer, RendererSettings, SceneQuery, WgpuContext};
pub use scene::{BlendMode, Camera, Light, Node, NodeHandle, Scene, Shape, ShapeKind, Transform};
