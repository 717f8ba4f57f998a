//! Build and query pipelines over the persisted artifacts

pub mod artifacts;
pub mod build;
pub mod recommend;

pub use artifacts::{load_artifacts, Artifacts};
pub use build::{build_artifacts, find_input_csv};
pub use recommend::{recommend, Recommendation, REASON};
