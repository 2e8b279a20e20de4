//! ERD (Entity-Relationship Diagram) generation module.
//!
//! This module provides:
//! - An ordered view of the catalog with table filters
//! - Multiple output formats: DOT (Graphviz), Mermaid, JSON

pub mod format;
pub mod view;

pub use format::{
    to_dot, to_json, to_mermaid, validate_dpi, DotOptions, ExportFormat, ImageFormat, Layout,
};
pub use view::{parse_patterns, EdgeInfo, ErdView, TableNode, ViewFilter};
