mod cleartool;
mod error;
mod types;

pub use cleartool::{Cleartool, parse_activity_list, parse_describe_output, parse_ls_output};
pub use error::{ToolError, is_server_down_message};
pub use types::{ActivityInfo, StatusOptions, StatusReport};

pub type Result<T> = std::result::Result<T, ToolError>;
