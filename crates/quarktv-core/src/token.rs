//! Signed CDN URL tokens
//!
//! **Not a cryptographic signature.** The token is a 32-bit rolling checksum
//! (`acc * 31 + c`, wrapping) over `key + path + expiration`. It is kept bit
//! for bit so URLs stay compatible with links already handed out; anyone who
//! sees a token can forge others. Do not reuse it for anything new.

use std::fmt;

/// Validity window of a signed URL, in seconds
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Source of the current Unix time
pub trait Clock: Send + Sync {
    /// Seconds since the Unix epoch
    fn now_unix(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_unix(&self) -> i64 {
        self.0
    }
}

/// Signature plus expiration for one resource path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityToken {
    pub signature: u32,
    /// Unix time after which the CDN should refuse the URL
    pub expires: i64,
}

impl SecurityToken {
    /// Sign `path` with a token valid for [`TOKEN_TTL_SECS`] from `now`
    pub fn generate(auth_key: &str, path: &str, now: i64) -> Self {
        Self::with_expiration(auth_key, path, now + TOKEN_TTL_SECS)
    }

    /// Sign `path` with an explicit expiration
    pub fn with_expiration(auth_key: &str, path: &str, expires: i64) -> Self {
        let input = signing_input(auth_key, path, expires);
        Self {
            signature: rolling_hash(&input).unsigned_abs(),
            expires,
        }
    }
}

/// Lowercase hex signature immediately followed by the decimal expiration
impl fmt::Display for SecurityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}{}", self.signature, self.expires)
    }
}

fn signing_input(auth_key: &str, path: &str, expires: i64) -> String {
    let slash = if path.starts_with('/') { "" } else { "/" };
    format!("{auth_key}{slash}{path}{expires}")
}

/// 32-bit signed rolling hash over UTF-16 code units
pub(crate) fn rolling_hash(input: &str) -> i32 {
    input.encode_utf16().fold(0i32, |acc, unit| {
        acc.wrapping_shl(5)
            .wrapping_sub(acc)
            .wrapping_add(i32::from(unit))
    })
}
