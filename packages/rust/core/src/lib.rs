//! Core generation pipeline for pageforge.
//!
//! Drives the end-to-end run: keyword loading, per-keyword content
//! synthesis, template rendering, and in-memory archive assembly, with
//! per-keyword failure isolation and progress reporting.

pub mod pipeline;

pub use pipeline::{
    GenerateConfig, GenerateResult, ProgressReporter, RunState, SilentProgress, build_archive,
    generate,
};
