pub mod config;
pub mod map;
pub mod replay;
pub mod report;
pub mod simulate;
