use std::fmt;
use std::str::FromStr;

/// A dotted numeric version such as `1.2` or `16.4.3528.331`.
///
/// Versions are ordered component by component. When one version is a prefix of the other
/// the shorter one sorts first, so `1.0 < 1.0.0`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    components: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{text}' is not a valid version, expected two to four numbers separated by '.'")]
pub struct VersionError {
    pub text: String,
}

impl Version {
    pub const MIN_COMPONENTS: usize = 2;
    pub const MAX_COMPONENTS: usize = 4;

    pub fn components(&self) -> &[u32] {
        &self.components
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let error = || VersionError { text: text.to_string() };

        let components = text
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(error())
                }
                part.parse::<u32>().map_err(|_| error())
            })
            .collect::<Result<Vec<_>, _>>()?;

        if !(Self::MIN_COMPONENTS..=Self::MAX_COMPONENTS).contains(&components.len()) {
            return Err(error())
        }
        Ok(Version { components })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        let parts: Vec<String> = self.components.iter().map(u32::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> Version {
        text.parse().unwrap_or_else(|e| panic!("{}", e))
    }

    #[test]
    fn test_valid_versions() {
        let cases = vec![
            ("1.0", vec![1, 0]),
            ("2.10.3", vec![2, 10, 3]),
            ("16.4.3528.331", vec![16, 4, 3528, 331]),
            ("01.002", vec![1, 2]),
        ];

        for (text, expected) in cases {
            assert_eq!(v(text).components(), expected.as_slice(), "Failed to parse {:?}", text);
        }
    }

    #[test]
    fn test_invalid_versions() {
        let cases = vec!["", "1", "1.", ".1", "1..2", "1.2.3.4.5", "1.a", "1.-2", "1.+2", "99999999999.1"];

        for text in cases {
            assert!(text.parse::<Version>().is_err(), "Expected {:?} to be rejected", text);
        }
    }

    #[test]
    fn test_ordering_is_numeric() {
        assert!(v("2.0") < v("10.0"));
        assert!(v("1.9.9") < v("1.10"));
        assert!(v("1.0") < v("1.0.0"));
        assert_eq!(v("3.01"), v("3.1"));
    }

    #[test]
    fn test_display() {
        assert_eq!(v("16.04.1").to_string(), "16.4.1");
    }
}
