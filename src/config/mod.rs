//! `.pytest-digest.toml` support
//!
//! Every key is optional; a missing file yields [`ConfigFile::default`].

pub mod file;
pub mod loader;

pub use file::{ConfigFile, KeywordSettings, CONFIG_FILE_NAME};
pub use loader::ConfigLoader;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_name_constant_is_correct() {
        assert_eq!(CONFIG_FILE_NAME, ".pytest-digest.toml");
    }
}
