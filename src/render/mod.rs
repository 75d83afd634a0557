pub mod gpu_types;
pub mod shaders;
pub mod state;

pub use gpu_types::*;
pub use state::Renderer;
