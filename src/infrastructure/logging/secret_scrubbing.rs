use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

static SHARED: LazyLock<CredentialScrubber> = LazyLock::new(CredentialScrubber::new);

/// Scrub `message` with the process-wide scrubber
pub fn scrub(message: &str) -> Cow<'_, str> {
    SHARED.scrub(message)
}

/// Redacts caller credentials from strings before they are logged.
///
/// Covers `Basic`/`Bearer` authorization values, `auth=` query parameters
/// (download links carry the credential there) and token or password fields
/// echoed back in remote error bodies.
#[derive(Clone)]
pub struct CredentialScrubber {
    scheme_pattern: Regex,
    query_pattern: Regex,
    field_pattern: Regex,
}

impl CredentialScrubber {
    /// Create a new scrubber
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            scheme_pattern: Regex::new(r"(?i)\b(basic|bearer)\s+[A-Za-z0-9+/=._~-]+")
                .expect("scheme pattern is valid"),
            query_pattern: Regex::new(r"(?i)([?&]auth=)[^&#\s]+")
                .expect("query pattern is valid"),
            field_pattern: Regex::new(
                r#"(?i)(["']?(?:api_?token|token|password)["']?\s*[:=]\s*["']?)[^"'\s,&}]+"#,
            )
            .expect("field pattern is valid"),
        }
    }

    /// Return `message` with every credential replaced by `[REDACTED]`
    pub fn scrub<'a>(&self, message: &'a str) -> Cow<'a, str> {
        let mut scrubbed = Cow::Borrowed(message);
        for (pattern, replacement) in [
            (&self.scheme_pattern, "$1 [REDACTED]"),
            (&self.query_pattern, "${1}[REDACTED]"),
            (&self.field_pattern, "${1}[REDACTED]"),
        ] {
            if pattern.is_match(&scrubbed) {
                scrubbed = Cow::Owned(pattern.replace_all(&scrubbed, replacement).into_owned());
            }
        }
        scrubbed
    }
}

impl Default for CredentialScrubber {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CredentialScrubber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialScrubber").finish()
    }
}
