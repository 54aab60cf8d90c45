//! archgraph scan: repository walk that gathers the file listing,
//! manifest contents and infrastructure config an analyzer needs.

pub mod file;
pub mod scan;

pub use file::FileRole;
pub use scan::{scan, FileExcerpt, RepoSnapshot};
