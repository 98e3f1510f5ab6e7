pub mod cli;
pub mod conf;
pub mod generator;
pub mod logging;
pub mod monitor;
pub mod record;
