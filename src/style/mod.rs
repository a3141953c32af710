pub mod config;
pub mod controller;
pub mod engine;
pub mod headless;
pub mod properties;
pub mod registry;
