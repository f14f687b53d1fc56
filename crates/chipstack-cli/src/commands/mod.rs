pub mod award;
pub mod chips;
pub mod config;
pub mod rank;
pub mod timer;
