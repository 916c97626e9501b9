//! Screen placement for the rendering side.

pub mod viewport;

pub use viewport::{ScreenPoint, Viewport};
