use std::fmt;

use rand::Rng;

/// A 6-digit one-time passcode.
///
/// Codes are drawn uniformly from `100000..=999999`, so the leading digit is
/// never zero and every code is exactly six characters.
#[derive(Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct OtpCode(String);

impl OtpCode {
    /// Generate a fresh random code.
    pub fn generate() -> Self {
        let value: u32 = rand::rng().random_range(100_000..=999_999);
        Self(value.to_string())
    }

    /// Wrap an already-known code, e.g. one read back from storage.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Codes end up in logs only on the deliberate degraded delivery path; keep
// them out of incidental Debug output everywhere else.
impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OtpCode(******)")
    }
}

#[cfg(test)]
mod tests {
    use super::OtpCode;

    #[test]
    fn generated_codes_are_six_decimal_digits() {
        for _ in 0..256 {
            let code = OtpCode::generate();
            assert_eq!(code.as_str().len(), 6);
            let value: u32 = code.as_str().parse().expect("decimal digits");
            assert!((100_000..=999_999).contains(&value));
        }
    }

    #[test]
    fn debug_never_prints_the_code() {
        let code = OtpCode::from_stored("123456");
        assert_eq!(format!("{code:?}"), "OtpCode(******)");
    }
}
