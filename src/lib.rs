pub mod braille;
pub mod config;
pub mod data;
pub mod error;
pub mod geo;
pub mod map;
