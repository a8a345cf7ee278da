use std::fmt;

/// Caller-supplied authorization value.
///
/// The relay never decodes or validates it; it is forwarded to the remote
/// service byte for byte. `Debug` output is redacted so the value cannot leak
/// through structured logging.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw header value. Blank values count as absent.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// The value to place in the outbound `Authorization` header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_credential_is_absent() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new("   ").is_none());
    }

    #[test]
    fn test_credential_is_forwarded_verbatim() {
        let credential = Credential::new("Basic dXNlcjp0b2tlbg==").unwrap();
        assert_eq!(credential.expose(), "Basic dXNlcjp0b2tlbg==");
    }

    #[test]
    fn test_debug_is_redacted() {
        let credential = Credential::new("Basic c2VjcmV0").unwrap();
        let printed = format!("{credential:?}");
        assert!(!printed.contains("c2VjcmV0"));
        assert!(printed.contains("REDACTED"));
    }
}
