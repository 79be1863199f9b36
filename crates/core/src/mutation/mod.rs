pub mod merge;
pub mod types;

pub use merge::{merge_content, replace_document};
pub use types::{ContentPatch, GenerateWebsite, ReplaceWebsite};
