pub mod extract;
pub mod html;
pub mod text;


pub use extract::{ExtractOptions, Extraction, ExtractionTier, NoTextFound, extract_article};
pub use html::Document;
