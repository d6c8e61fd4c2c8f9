pub mod config;
pub mod ids;
pub mod lead;
pub mod note;
pub mod task;

pub use config::*;
pub use ids::*;
pub use lead::*;
pub use note::*;
pub use task::*;
