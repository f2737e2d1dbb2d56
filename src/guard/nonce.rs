//! Nonces for temp-account proofs.

use rand::Rng;

/// Characters a nonce is drawn from.
pub const NONCE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of every generated nonce.
pub const NONCE_LENGTH: usize = 16;

/// Generate a fresh random nonce.
pub fn generate_nonce() -> String {
    let mut rng = rand::thread_rng();
    (0..NONCE_LENGTH)
        .map(|_| NONCE_ALPHABET[rng.gen_range(0..NONCE_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_shape() {
        let nonce = generate_nonce();
        assert_eq!(nonce.len(), NONCE_LENGTH);
        assert!(nonce.bytes().all(|b| NONCE_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_nonces_differ() {
        assert_ne!(generate_nonce(), generate_nonce());
    }
}
