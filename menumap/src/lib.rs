// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{load_scan, parse_format, resolve_output_path};

// Re-export scan orchestration from menumap-core
pub use menumap_core::scan::{ScanOptions, ScanProgressCallback, execute_scan};
