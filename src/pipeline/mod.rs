pub mod buffer;
pub mod renderer;

pub use buffer::{Buffer, Cell, BACKGROUND};
pub use renderer::Renderer;
