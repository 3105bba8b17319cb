pub mod app_config;
pub mod loader;

pub use app_config::Config;
pub use loader::{load_file, read_upload, LoadError, LoadReport, UploadKind};
