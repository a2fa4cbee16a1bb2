mod activity_manager;
mod changelist_builder;
mod collector;
mod element_provider;
mod progress;
mod project_host;
mod status_query;

pub use activity_manager::ActivityManager;
pub use changelist_builder::ChangelistBuilder;
pub use collector::{CollectedFiles, WritableCollector};
pub use element_provider::ElementProvider;
pub use progress::{ProgressReporter, SilentProgress};
pub use project_host::ProjectHost;
pub use status_query::StatusQuery;
