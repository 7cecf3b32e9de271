pub mod file;
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

pub use file::FileStore;
pub use memory::MemoryStore;
#[cfg(feature = "s3")]
pub use s3::S3Store;

use crate::errors::{Result, ShortledgerError};

/// Reject keys that could escape the bucket
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ShortledgerError::invalid_input("object key cannot be empty"));
    }
    if key.starts_with('/') || key.split('/').any(|part| part == ".." || part == ".") {
        return Err(ShortledgerError::invalid_input(format!(
            "invalid object key: {}",
            key
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("urls.json").is_ok());
        assert!(validate_key("ledgers/urls.json").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("../urls.json").is_err());
        assert!(validate_key("a/./b").is_err());
    }
}
