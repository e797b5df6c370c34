mod json_file;

pub use self::json_file::{JsonFileCache, DEFAULT_KEY};
