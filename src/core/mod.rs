pub mod camera;
pub mod light;
pub mod object;

pub use camera::{Basis, Camera};
pub use light::Light;
pub use object::{Face, Material, Object, Vertex};
