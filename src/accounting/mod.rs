pub mod aggregate;
pub mod merge;
