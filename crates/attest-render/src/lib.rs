//! Rendering utilities for CI surfaces (JUnit XML, Markdown summaries).

#![forbid(unsafe_code)]

mod junit;
mod markdown;
mod model;

pub use junit::{SUITE_NAME, escape_xml, project_junit, render_junit};
pub use markdown::render_summary;
pub use model::{JunitCase, JunitFailure, JunitReport, JunitSuite};

#[cfg(test)]
mod proptests;
