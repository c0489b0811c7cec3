//! Aether Studio: a terminal code studio.
//!
//! An editor pane, a language selector, and an output/preview pane. Code
//! is never executed — the run action asks an external generative model to
//! conceptually simulate execution; HTML and CSS get a composed live
//! preview document instead. The model is abstracted behind the
//! [`services::oracle::Oracle`] trait so everything above it is testable
//! with deterministic stubs.

pub mod app;
pub mod config;
pub mod highlight;
pub mod model;
pub mod services;
pub mod view;
