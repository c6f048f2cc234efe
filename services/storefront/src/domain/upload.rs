use sha2::{Digest, Sha256};

/// Sign upload parameters for the media host.
///
/// Pairs are sorted by name, joined as `k=v&k=v`, the secret is appended
/// and the result hashed with SHA-256 (lowercase hex). Empty values are
/// left out.
pub fn sign_params(params: &[(&str, &str)], secret: &str) -> String {
    let mut pairs: Vec<&(&str, &str)> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    let joined = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}
