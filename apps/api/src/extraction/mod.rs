// Text extraction from uploaded documents. Only PDF is accepted today.

pub mod pdf;

pub use pdf::{extract_pdf_text, extract_pdf_text_blocking, ExtractionError};
