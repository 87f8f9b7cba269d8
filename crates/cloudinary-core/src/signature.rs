//! Request signing.
//!
//! The string to sign is every participating parameter as `key=value`, sorted
//! byte-wise by key and joined with `&`, with the API secret appended directly
//! (no separator). The SHA-1 digest of that string, hex-encoded in lowercase,
//! is sent as the `signature` field.

use sha1::{Digest, Sha1};
use std::collections::BTreeMap;

/// Parameters that never take part in a signature even when present in a request.
pub const UNSIGNED_PARAMS: &[&str] = &["api_key", "file", "resource_type", "signature"];

/// Build the canonical `k1=v1&k2=v2` string over the signable parameters.
pub fn string_to_sign<I, K, V>(params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let sorted: BTreeMap<String, String> = params
        .into_iter()
        .filter(|(k, _)| !UNSIGNED_PARAMS.contains(&k.as_ref()))
        .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
        .collect();

    sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Sign `params` with `secret`.
///
/// Deterministic: the result depends only on the parameter set and the secret,
/// never on the iteration order of `params`.
pub fn sign<I, K, V>(params: I, secret: &str) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut hasher = Sha1::new();
    hasher.update(string_to_sign(params).as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sha1_hex(input: &str) -> String {
        hex::encode(Sha1::digest(input.as_bytes()))
    }

    #[test]
    fn test_string_to_sign_sorted() {
        let params = [
            ("timestamp", "1315060510"),
            ("public_id", "sample"),
            ("eager", "w_400"),
        ];
        assert_eq!(
            string_to_sign(params),
            "eager=w_400&public_id=sample&timestamp=1315060510"
        );
    }

    #[test]
    fn test_unsigned_params_excluded() {
        let params = [
            ("api_key", "1234"),
            ("file", "https://example.com/a.png"),
            ("resource_type", "raw"),
            ("signature", "abc"),
            ("timestamp", "1"),
        ];
        assert_eq!(string_to_sign(params), "timestamp=1");
    }

    #[test]
    fn test_sign_known_vector() {
        // Documented example from the upload API reference.
        let params = [
            ("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop"),
            ("public_id", "sample_image"),
            ("timestamp", "1315060510"),
        ];
        assert_eq!(
            sign(params, "abcd"),
            "bfd09f95f331f558cbd1320e67aa8d488770583e"
        );
    }

    #[test]
    fn test_sign_secret_appended_without_separator() {
        let params = [("public_id", "a/b"), ("timestamp", "42")];
        assert_eq!(
            sign(params, "s3cr3t"),
            sha1_hex("public_id=a/b&timestamp=42s3cr3t")
        );
    }

    #[test]
    fn test_sign_order_independent() {
        let forward = [
            ("from_public_id", "old"),
            ("timestamp", "100"),
            ("to_public_id", "new"),
        ];
        let mut reversed = forward;
        reversed.reverse();
        assert_eq!(sign(forward, "secret"), sign(reversed, "secret"));
    }

    #[test]
    fn test_sign_is_lowercase_hex() {
        let sig = sign([("timestamp", "0")], "x");
        assert_eq!(sig.len(), 40);
        assert!(sig
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_byte_wise_key_order() {
        // Uppercase sorts before lowercase in byte order.
        let params = [("b", "2"), ("B", "1"), ("a", "0")];
        assert_eq!(string_to_sign(params), "B=1&a=0&b=2");
    }
}
