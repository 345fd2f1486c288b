pub mod change;
pub mod comparison;
pub mod error;
pub mod ports;
pub mod value_objects;
