//! Build run status, end-to-end times and push frequency reports derived
//! from buildbot scheduler rows.

pub mod branch;
pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod pushes;
pub mod query;
pub mod render;
pub mod report;
pub mod run;
pub mod source;
pub mod status;
pub mod window;

pub use error::{Error, Result};
pub use model::{BuildRequest, BuildRequestRow, BuildResult};
pub use pushes::{Push, PushesReport};
pub use report::EndToEndTimesReport;
pub use run::BuildRun;
pub use status::Status;
pub use window::TimeWindow;
