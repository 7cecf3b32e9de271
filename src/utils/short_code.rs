use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use sha1::{Digest, Sha1};

/// 短码长度
pub const SHORT_CODE_LENGTH: usize = 10;

/// Deterministic short code for a URL
///
/// SHA-1 of the UTF-8 bytes, URL-safe base64, first 10 characters. Codes
/// are compatible with ledgers written by earlier deployments.
pub fn generate_short_code(url: &str) -> String {
    let digest = Sha1::digest(url.as_bytes());
    let mut encoded = URL_SAFE.encode(digest);
    encoded.truncate(SHORT_CODE_LENGTH);
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(generate_short_code("https://www.google.com"), "7378mDnD7g");
        assert_eq!(generate_short_code("https://www.reddit.com"), "G_D9V2TdGF");
        assert_eq!(generate_short_code("www.google.com"), "2LmfaLIItU");
    }

    #[test]
    fn test_length_and_alphabet() {
        for url in [
            "www.google.com",
            "www.facebook.com",
            "www.reddit.com",
            "https://example.com/a/very/long/path?with=query&and=more#fragment",
            "https://例子.测试/路径",
        ] {
            let code = generate_short_code(url);
            assert_eq!(code.len(), SHORT_CODE_LENGTH);
            assert!(
                code.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
                "unexpected character in {}",
                code
            );
        }
    }

    #[test]
    fn test_deterministic() {
        let first = generate_short_code("https://facebook.com");
        for _ in 0..5 {
            assert_eq!(generate_short_code("https://facebook.com"), first);
        }
        assert_ne!(first, generate_short_code("https://facebook.com/"));
    }
}
