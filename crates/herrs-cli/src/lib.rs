//! herrs command-line interface.
//!
//! Lists the error kind registry and previews how a wrapped error chain is
//! rendered and logged.

pub mod demo;
pub mod options;
pub mod registry;

pub use demo::{DemoReport, run_demo, sample_chain};
pub use options::RenderArgs;
pub use registry::{KindInfo, kind_infos, lookup, render_json, render_table};
