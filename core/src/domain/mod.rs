pub mod allergen;
pub mod common;
pub mod scan;
