//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// `check`: verifies the external tools can be started.
pub mod check;
/// `classify`: aspect bucket of each input video.
pub mod classify;
/// `faststart`: remuxes an mp4 with its index at the front.
pub mod faststart;
/// `upload-video` and `upload-thumbnail`: the ingest pipeline into the local store.
pub mod upload;
