pub mod error;
pub mod normalize;
pub mod plan;
