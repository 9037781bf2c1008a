pub mod app;
pub mod browse;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod fetcher;
pub mod loading;
pub mod logging;
pub mod model;
pub mod output;
pub mod runner;
pub mod utils;

#[cfg(test)]
mod tests;
