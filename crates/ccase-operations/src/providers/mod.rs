mod cleartool;
mod collector;
mod host;
mod report;

pub use cleartool::{CleartoolActivityManager, CleartoolElementProvider, CleartoolStatusQuery};
pub use collector::FileSystemCollector;
pub use host::ViewHost;
pub use report::{ChangeReport, LocallyDeleted, ReportedChange};
