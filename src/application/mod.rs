pub mod aggregate;
pub mod compare;
pub mod monitoring;
pub mod normalize;
