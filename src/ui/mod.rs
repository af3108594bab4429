/// Terminal presentation: input mapping, overlays, and rendering.

pub mod canvas;
pub mod hud;
pub mod input;
pub mod renderer;
