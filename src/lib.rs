pub mod analysis;
pub mod cache;
pub mod cfbd;
pub mod cli;
pub mod config;
pub mod espn;
pub mod model;
pub mod pipeline;
pub mod report;
