use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the UTF-8 bytes of `value`
pub fn encoded_hash(value: &str) -> String {
    Sha256::digest(value.as_bytes())
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_digest() {
        assert_eq!(
            encoded_hash("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn trailing_whitespace_changes_the_key() {
        assert_ne!(encoded_hash("Hello"), encoded_hash("Hello\n"));
        assert_eq!(encoded_hash("Hello").len(), 64);
    }
}
