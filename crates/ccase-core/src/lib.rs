mod path;
pub mod scope;
pub mod tracking;
pub mod types;

pub use path::{
    canonical_local_path, is_writable, same_path_ignore_case, starts_with_ignore_case,
};
pub use scope::{DirtyPath, DirtyScope};
pub use tracking::TrackingState;
pub use types::*;
