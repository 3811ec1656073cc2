pub mod lines;
pub mod mock;
pub mod ocr;

pub use lines::{split_recognized_text, trim_text, TextItem};
pub use mock::MockRecognizer;
pub use ocr::{extract_content, TextRecognizer, VisionOcr};
