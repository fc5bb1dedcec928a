mod geometry;
mod projection;
mod renderer;

pub use projection::Viewport;
pub use renderer::{MapRenderer, StateShape, SHADE_BUCKETS};
