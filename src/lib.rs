pub mod app;
pub mod args;
pub mod colors;
pub mod error;
pub mod file_node;
pub mod logging;
pub mod sort;
pub mod ui;
pub mod utils;

pub use app::App;
pub use args::Args;
pub use error::{Blocked, NodeError, WriteOutcome};
pub use file_node::{FileNode, Size};
pub use sort::{SortDirection, SortMode};
