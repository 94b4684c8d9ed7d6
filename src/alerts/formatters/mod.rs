pub mod text;
pub mod json;

pub use text::TextFormatter;
pub use json::JsonFormatter;
