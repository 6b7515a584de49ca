pub mod env;
pub mod generator;
pub mod observability;
pub mod parallel;
pub mod sequence;
