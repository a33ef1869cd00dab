pub mod course_info;
pub mod extractor;
mod generator;
pub mod markup;

pub use course_info::format_course_info;
pub use extractor::{CaptionFields, extract_title_and_subtitle, strip_code_fences};
pub use generator::{CaptionGenerator, build_prompt};
pub use markup::{apply_title_revision, parse_revision_input, to_html_caption};
