pub mod config;
pub mod logging;

pub mod audit;
pub mod probe;
pub mod roster;
