//! A small SQL engine modelled on toydb (https://github.com/erikgrinaker/toydb).
pub mod engine;
pub mod execution;
pub mod parser;
pub mod planner;

#[cfg(test)]
mod tests;
