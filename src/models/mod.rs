//! Typed domain records
//!
//! Read-only projections of the JSON the platform returns, plus the request
//! payloads used to create objects. Every response record implements
//! [`crate::decode::Record`].

mod alert;
mod dashboard;
mod feature;
mod instance;
mod model;
mod source;
mod task;
mod workspace;

pub use alert::{AlertInfo, AlertType, NewAlert, MIN_TIME_STALL_SECS};
pub use dashboard::{DashboardInfo, NewDashboard, NewVisualization, VisualizationInfo};
pub use feature::{FeatureType, SourceFeature};
pub use instance::{InstanceQuery, InstanceTable, UpdateInstances};
pub use model::{ModelInfo, ModelMethod, ModelType, NewModel};
pub use source::{ExternalSource, RealTimeSource, Source, SourceInfo, SourceType, StandardSource};
pub use task::{TaskInfo, TaskStatus};
pub use workspace::WorkspaceInfo;
