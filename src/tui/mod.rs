pub mod render;
pub mod runtime;

pub use render::{accent_color, draw_dashboard, DEFAULT_ACCENT};
pub use runtime::{run_dashboard, EffectRunner};
