//! Text replacement engine for rasterized document pages.
//!
//! Locates foreign-script text regions (via a detection collaborator),
//! erases them against the surrounding artwork and renders translated
//! text in place, reporting per-region outcomes.

pub mod backend;
pub mod config;
pub mod eraser;
pub mod error;
pub mod font;
pub mod geometry;
pub mod pipeline;
pub mod region;
pub mod render;
pub mod report;
pub mod retry;
