// Core modules
mod config;
mod error;
mod root;
mod services;
mod settings;
mod store;

// CLI module
pub mod cli;

// Public exports
pub use config::{
    get_app_config_dir, get_history_path, get_roots_path, get_settings_path, read_json_file,
    write_json_file, HOME_ENV,
};
pub use error::AppError;
pub use root::{ImportAction, ImportPreviewItem, RootEntry};
pub use services::import_export::{is_header_only, preview_to_map, to_csv, CSV_HEADER};
pub use services::segment::segment;
pub use services::translation::{is_complete, resolve, split_lines, translate, JOIN_SEPARATOR};
pub use services::{
    HistoryEntry, HistoryLog, HistoryRecorder, ImportExportService, MergeSummary, RootSnapshot,
    RootStore, Segment, TranslatedLine, TranslationResult, TranslationService,
};
pub use settings::{get_settings, update_settings, AppSettings};
pub use store::AppState;
