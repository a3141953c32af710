pub mod args;
pub mod geometry;
