pub mod accumulator;
pub mod adapter;
pub mod config;
pub mod error;
mod generator;
pub mod lifecycle;
pub mod report;
pub mod sink;
pub mod tick;

pub use generator::GameStateGenerator;

#[cfg(test)]
mod tests;
