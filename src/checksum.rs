// Whole-image digest checksums.
//
// These identify ROM dumps against release databases; they are unrelated
// to the 16-bit header checksum the console boot code verifies (see
// `header::word_checksum`).

use md5::Digest;

use std::fmt;
use std::str::FromStr;

/// Digest algorithms supported by the `checksum` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Md5,
    Sha1,
    Crc32,
}

impl Algorithm {
    /// All supported algorithms, in display order.
    pub const ALL: [Algorithm; 3] = [Algorithm::Md5, Algorithm::Sha1, Algorithm::Crc32];

    /// Compute the digest of `data` as uppercase hex.
    pub fn digest(self, data: &[u8]) -> String {
        match self {
            Algorithm::Md5 => hex_upper(&md5::Md5::digest(data)),
            Algorithm::Sha1 => hex_upper(&sha1::Sha1::digest(data)),
            Algorithm::Crc32 => format!("{:08X}", crc32fast::hash(data)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Md5 => write!(f, "md5"),
            Algorithm::Sha1 => write!(f, "sha1"),
            Algorithm::Crc32 => write!(f, "crc32"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "md5" => Ok(Algorithm::Md5),
            "sha1" => Ok(Algorithm::Sha1),
            "crc32" => Ok(Algorithm::Crc32),
            _ => Err(UnknownAlgorithm(s.to_owned())),
        }
    }
}

/// The requested digest name is not supported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown checksum algorithm {0:?}, valid algorithms: md5, sha1, crc32")]
pub struct UnknownAlgorithm(pub String);

/// Compare `data` against an expected digest, case-insensitively.
pub fn verify(algorithm: Algorithm, data: &[u8], expected: &str) -> bool {
    algorithm.digest(data) == expected.to_uppercase()
}

fn hex_upper(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{b:02X}"));
    }
    s
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digests() {
        // Standard test vectors for "abc".
        assert_eq!(
            Algorithm::Md5.digest(b"abc"),
            "900150983CD24FB0D6963F7D28E17F72"
        );
        assert_eq!(
            Algorithm::Sha1.digest(b"abc"),
            "A9993E364706816ABA3E25717850C26C9CD0D89D"
        );
        assert_eq!(Algorithm::Crc32.digest(b"abc"), "352441C2");
    }

    #[test]
    fn verify_is_case_insensitive() {
        assert!(verify(Algorithm::Crc32, b"abc", "352441c2"));
        assert!(!verify(Algorithm::Crc32, b"abc", "00000000"));
    }

    #[test]
    fn algorithm_names_roundtrip() {
        for algo in Algorithm::ALL {
            assert_eq!(algo.to_string().parse::<Algorithm>().unwrap(), algo);
        }
        assert!("sha256".parse::<Algorithm>().is_err());
    }
}
