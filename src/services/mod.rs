pub mod dictionary;
pub mod history;
pub mod import_export;
pub mod segment;
pub mod translation;

pub use dictionary::{MergeSummary, RootStore};
pub use history::{HistoryEntry, HistoryLog, HistoryRecorder};
pub use import_export::ImportExportService;
pub use segment::{RootSnapshot, Segment};
pub use translation::{TranslatedLine, TranslationResult, TranslationService};
