//! Short code generation.
//!
//! Codes are fixed-length strings over a 64-symbol URL-safe alphabet, drawn
//! from the operating system's CSPRNG.

/// URL-safe alphabet: `A-Z`, `a-z`, `0-9`, `-`, `_`.
pub const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Default code length. 64^7 is roughly 4.4 * 10^12 combinations.
pub const DEFAULT_CODE_LENGTH: usize = 7;

/// Codes that would shadow fixed routes and are never handed out.
pub const RESERVED_CODES: &[&str] = &["shorten", "health", "stats", "api", "admin"];

/// Source of candidate short codes.
///
/// Implementations must be safe to call from many tasks at once without
/// coordination.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Produces a fresh candidate code.
    fn generate(&self) -> String;
}

/// Cryptographically secure random code generator.
///
/// Each output byte of `getrandom` is masked down to 6 bits and used as an
/// index into [`ALPHABET`]. 256 is a multiple of 64, so the mapping is
/// exactly uniform.
#[derive(Debug, Clone, Copy)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    /// # Panics
    ///
    /// Panics if the system random number generator fails (extremely rare).
    fn generate(&self) -> String {
        let mut buffer = vec![0u8; self.length];

        getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

        buffer
            .into_iter()
            .map(|b| ALPHABET[(b & 63) as usize] as char)
            .collect()
    }
}

/// Returns true if the code collides with a fixed route.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Returns true if every character of `code` belongs to [`ALPHABET`].
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| ALPHABET.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_alphabet_has_64_unique_symbols() {
        let unique: HashSet<_> = ALPHABET.iter().collect();
        assert_eq!(unique.len(), 64);
    }

    #[test]
    fn test_generate_code_has_default_length() {
        let code = RandomCodeGenerator::default().generate();
        assert_eq!(code.len(), 7);
    }

    #[test]
    fn test_generate_code_respects_configured_length() {
        for length in [4, 7, 12, 32] {
            let code = RandomCodeGenerator::new(length).generate();
            assert_eq!(code.len(), length);
        }
    }

    #[test]
    fn test_generate_code_url_safe_characters() {
        let generator = RandomCodeGenerator::default();

        for _ in 0..500 {
            let code = generator.generate();
            assert!(
                code.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
                "unexpected character in {code}"
            );
            assert!(is_valid_code(&code));
        }
    }

    #[test]
    fn test_generate_code_produces_unique_codes() {
        let generator = RandomCodeGenerator::default();
        let mut codes = HashSet::new();

        for _ in 0..1000 {
            codes.insert(generator.generate());
        }

        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_generate_code_from_many_threads() {
        let generator = RandomCodeGenerator::default();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(move || {
                    (0..100).map(|_| generator.generate()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut codes = HashSet::new();
        for handle in handles {
            for code in handle.join().unwrap() {
                assert_eq!(code.len(), DEFAULT_CODE_LENGTH);
                codes.insert(code);
            }
        }

        assert_eq!(codes.len(), 800);
    }

    #[test]
    fn test_generated_codes_cover_alphabet() {
        let generator = RandomCodeGenerator::new(32);
        let mut seen = HashSet::new();

        for _ in 0..200 {
            seen.extend(generator.generate().into_bytes());
        }

        // 6400 uniform draws over 64 symbols miss one with negligible probability.
        assert_eq!(seen.len(), 64);
    }

    #[test]
    fn test_reserved_codes() {
        for &reserved in RESERVED_CODES {
            assert!(is_reserved(reserved), "'{reserved}' should be reserved");
        }
        assert!(!is_reserved("Ab3xQ9z"));
    }

    #[test]
    fn test_is_valid_code_rejects_foreign_characters() {
        assert!(is_valid_code("Ab3xQ9z"));
        assert!(is_valid_code("a-b_c"));
        assert!(!is_valid_code(""));
        assert!(!is_valid_code("abc def"));
        assert!(!is_valid_code("abc.def"));
        assert!(!is_valid_code("ab%2F"));
    }
}
