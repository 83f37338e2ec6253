//! Multipart boundary token generation.

use rand::Rng;

/// Length of a generated boundary token.
const BOUNDARY_LEN: usize = 24;

/// Alphabet for boundary tokens.
///
/// Hex digits cannot appear in a base64-encoded part in a way that is
/// ambiguous to a MIME parser at this token length, so encoded bodies
/// never collide with the delimiter.
const BOUNDARY_ALPHABET: &[u8] = b"0123456789ABCDEF";

/// Source of multipart boundary tokens.
///
/// Rendering draws one fresh token per invocation, so repeated renders of
/// the same message produce different but equally valid boundaries. Inject
/// [`FixedBoundary`] to make rendering deterministic under test.
pub trait BoundarySource {
    /// Returns the next boundary token.
    fn boundary(&mut self) -> String;
}

/// Default source: 24 random hexadecimal characters per token.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomBoundary;

impl BoundarySource for RandomBoundary {
    fn boundary(&mut self) -> String {
        let mut rng = rand::thread_rng();
        (0..BOUNDARY_LEN)
            .map(|_| BOUNDARY_ALPHABET[rng.gen_range(0..BOUNDARY_ALPHABET.len())] as char)
            .collect()
    }
}

/// Deterministic source returning the same token on every draw.
#[derive(Debug, Clone)]
pub struct FixedBoundary(pub String);

impl BoundarySource for FixedBoundary {
    fn boundary(&mut self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_boundary_shape() {
        let token = RandomBoundary.boundary();
        assert_eq!(token.len(), 24);
        assert!(token.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn random_boundaries_differ_across_draws() {
        let mut source = RandomBoundary;
        // 16^24 tokens; a collision here means the source is broken
        assert_ne!(source.boundary(), source.boundary());
    }

    #[test]
    fn fixed_boundary_repeats() {
        let mut source = FixedBoundary("AAAA".into());
        assert_eq!(source.boundary(), "AAAA");
        assert_eq!(source.boundary(), "AAAA");
    }
}
