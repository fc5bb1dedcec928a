mod canvas;

pub use canvas::BrailleCanvas;

/// Shade value reserved for state outlines, drawn over any fill.
pub const OUTLINE_SHADE: u8 = u8::MAX;
