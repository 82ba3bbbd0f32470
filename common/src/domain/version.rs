use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;

// Dot-separated numeric components, e.g. "2", "1.4" or "1.2.0".
// Components are capped at nine digits so they always fit into u32.
pub const VERSION_NUMBER_REGEX: &str = r"^\d{1,9}(\.\d{1,9})*$";

static VERSION_NUMBER_REGEX_COMPILED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(VERSION_NUMBER_REGEX).expect("VERSION_NUMBER_REGEX must be a valid regex")
});

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 64, regex = VERSION_NUMBER_REGEX_COMPILED),
    derive(
        Clone,
        Debug,
        Display,
        FromStr,
        AsRef,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct VersionNumber(String);

impl VersionNumber {
    pub fn components(&self) -> Vec<u32> {
        self.as_ref()
            .split('.')
            .filter_map(|part| part.parse().ok())
            .collect()
    }

    /// Next patch release: `1.2.0` -> `1.2.1`.
    /// Versions shorter than `major.minor.patch` are padded with zeros first.
    pub fn next_patch(&self) -> Result<Self, VersionNumberError> {
        let mut components = self.components();
        if components.len() < 3 {
            components.resize(3, 0);
        }
        components[2] += 1;

        let next = components
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(".");
        Self::try_new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_dot_separated_numbers() {
        assert!(VersionNumber::try_new("1").is_ok());
        assert!(VersionNumber::try_new(" 1.4 ").is_ok());
        assert!(VersionNumber::try_new("10.20.30.40").is_ok());
    }

    #[test]
    fn rejects_malformed_versions() {
        assert!(VersionNumber::try_new("").is_err());
        assert!(VersionNumber::try_new("v1.0.0").is_err());
        assert!(VersionNumber::try_new("1..0").is_err());
        assert!(VersionNumber::try_new("1.0.0-beta").is_err());
    }

    #[test]
    fn next_patch_increments_third_component() {
        let version = VersionNumber::try_new("1.2.0").unwrap();
        assert_eq!(version.next_patch().unwrap().to_string(), "1.2.1");

        let version = VersionNumber::try_new("3.0.9.7").unwrap();
        assert_eq!(version.next_patch().unwrap().to_string(), "3.0.10.7");
    }

    #[test]
    fn next_patch_pads_short_versions() {
        let version = VersionNumber::try_new("2").unwrap();
        assert_eq!(version.next_patch().unwrap().to_string(), "2.0.1");

        let version = VersionNumber::try_new("2.5").unwrap();
        assert_eq!(version.next_patch().unwrap().to_string(), "2.5.1");
    }

    #[test]
    fn next_patch_fails_when_component_outgrows_limit() {
        let version = VersionNumber::try_new("1.0.999999999").unwrap();
        assert!(version.next_patch().is_err());
    }
}
