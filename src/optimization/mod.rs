pub mod plan;
pub mod simplify;
