pub mod entities;
pub mod ports;
pub mod prompt;
pub mod refiner;
pub mod reply;
pub mod schema;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use ports::*;
pub use value_objects::*;
