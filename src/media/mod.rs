// SPDX-License-Identifier: MPL-2.0
//! Consumer-side media helpers.
//!
//! The engine emits raw RGBA frames; this module turns them into files.

pub mod frame_export;

pub use frame_export::{export_frame, generate_default_filename, ExportFormat};
