//! Spreadsheet-to-catalogue import pipeline.
//!
//! The catalogue is maintained in a multi-sheet workbook and reconciled
//! into the product table as an out-of-band batch job (CLI command or
//! admin endpoint). See [`sheets::SheetImporter`].

pub mod images;
pub mod normalize;
pub mod sheets;

pub use images::resolve_image_url;
pub use sheets::{ImportError, ImportSummary, SHEETS, SheetImporter, SheetReport};
