pub mod cross_reactivity;
pub mod entities;

pub use entities::*;
