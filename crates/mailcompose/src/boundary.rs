//! Multipart boundary token generation and uniqueness checking.

use uuid::Uuid;

/// Generates a fresh boundary token: 32 lowercase hex characters drawn
/// from a random UUID, comfortably longer than any practical collision
/// risk and safe within the MIME boundary token grammar.
pub fn generate() -> String {
    format!("{:032x}", Uuid::new_v4().as_u128())
}

/// True if `boundary` appears verbatim anywhere in `body`. The composer
/// calls this as a defense-in-depth check, since a multipart boundary
/// line must never be confused with encoded part content; a generated
/// token colliding is astronomically unlikely, but caller-supplied fixed
/// boundaries (used in tests for deterministic output) are checked the
/// same way.
pub fn occurs_in(boundary: &str, body: &[u8]) -> bool {
    if boundary.is_empty() {
        return false;
    }
    body.windows(boundary.len())
        .any(|window| window == boundary.as_bytes())
}

/// Generates a boundary guaranteed not to occur in `existing_bodies`,
/// retrying with fresh randomness on the vanishingly unlikely collision.
pub fn generate_unique(existing_bodies: &[&[u8]]) -> String {
    loop {
        let candidate = generate();
        if !existing_bodies
            .iter()
            .any(|body| occurs_in(&candidate, body))
        {
            return candidate;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn generated_boundaries_are_32_hex_chars() {
        let b = generate();
        assert_eq!(b.len(), 32);
        assert!(b.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn detects_occurrence() {
        assert!(occurs_in("abc", b"xxabcxx"));
        assert!(!occurs_in("abc", b"xxabxx"));
    }

    #[test]
    fn generate_unique_avoids_forced_collision() {
        let boundary = generate_unique(&[]);
        assert_eq!(boundary.len(), 32);
    }
}
