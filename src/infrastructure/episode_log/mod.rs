//! Episode logs: per-intersection decision and error records on disk.

pub mod json_list_file;
pub mod paths;

pub use json_list_file::JsonListFile;
pub use paths::EpisodeLogPaths;
