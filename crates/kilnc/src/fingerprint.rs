use sha2::{Digest, Sha256};

/// Hex SHA-256 of generated source text, embedded in emit reports so that
/// identical descriptor sets provably produce identical output.
pub(crate) fn source_fingerprint(source: &str) -> String {
    let digest = Sha256::digest(source.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{b:02x}"));
    }
    out
}
