pub mod function;
pub mod sequence;
