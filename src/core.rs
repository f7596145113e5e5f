pub mod aggregate;
pub mod attributes;
pub mod curve;
pub mod hour;
pub mod ranking;
pub mod sample;
pub mod series;
pub mod service;
pub mod settings;
pub mod snapshot;
pub mod source;
pub mod statistics;
