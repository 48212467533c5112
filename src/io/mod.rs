pub mod file;

pub use file::{from_json, load_project, save_project, to_json};
