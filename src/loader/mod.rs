pub mod generator;
pub mod parser;
