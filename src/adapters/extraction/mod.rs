//! Text Extraction Adapters
//!
//! - **PlainTextExtractor** - UTF-8 text, markdown and CSV uploads

mod plain_text_extractor;

pub use plain_text_extractor::PlainTextExtractor;
