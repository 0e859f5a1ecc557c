//! Kluster command line service: rechunking, vessel files and sounding export.

pub mod commands;
pub mod config;

pub use config::KlusterConfig;
