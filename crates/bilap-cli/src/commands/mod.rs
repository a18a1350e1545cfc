pub mod experiment;
pub mod spectrum;
