pub mod catalog;
pub mod graph;
pub mod render;
