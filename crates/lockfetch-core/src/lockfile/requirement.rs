//! One logical requirement line and the name/version/hashes derived from it.

use std::fmt;

/// Version reported for requirements without an `==` pin.
pub const ANY_VERSION: &str = "*";

const HASH_SHA256_PREFIX: &str = "--hash=sha256:";

/// A requirement as written in the lockfile.
///
/// `source` is handed to the fetch command verbatim; `name` and `version`
/// exist for reporting and artifact lookup only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementSpec {
    source: String,
    name: String,
    version: String,
}

impl RequirementSpec {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let (name, version) = split_name_version(&source);
        Self {
            source,
            name,
            version,
        }
    }

    /// Full logical line, including hash directives and markers.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pinned version, or [`ANY_VERSION`] when the line has no `==`.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn is_pinned(&self) -> bool {
        self.version != ANY_VERSION
    }

    /// Lowercase hex digests from `--hash=sha256:<hex>` directives, in order.
    pub fn sha256_hashes(&self) -> Vec<String> {
        self.source
            .split_whitespace()
            .filter_map(|tok| tok.strip_prefix(HASH_SHA256_PREFIX))
            .filter(|hex| !hex.is_empty())
            .map(|hex| hex.to_ascii_lowercase())
            .collect()
    }
}

impl fmt::Display for RequirementSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=={}", self.name, self.version)
    }
}

/// Split on the first `==`. The name is the first whitespace token on the
/// left with any `[extras]` dropped; the version runs up to whitespace, `;`,
/// `,` or a stray `\` on the right.
fn split_name_version(source: &str) -> (String, String) {
    let (left, right) = match source.split_once("==") {
        Some((l, r)) => (l, Some(r)),
        None => (source, None),
    };

    let name = left
        .split_whitespace()
        .next()
        .unwrap_or("")
        .split(|c: char| c == '[' || c == ';')
        .next()
        .unwrap_or("")
        .trim()
        .to_string();

    let version = right
        .map(|r| r.trim_start_matches('=').trim_start())
        .and_then(|r| {
            r.split(|c: char| c.is_whitespace() || matches!(c, ';' | ',' | '\\'))
                .next()
                .filter(|v| !v.is_empty())
        })
        .unwrap_or(ANY_VERSION)
        .to_string();

    (name, version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_and_version_from_pinned_line() {
        let r = RequirementSpec::new("foo==1.0.0 --hash=sha256:abcd");
        assert_eq!(r.name(), "foo");
        assert_eq!(r.version(), "1.0.0");
        assert!(r.is_pinned());
        assert_eq!(r.to_string(), "foo==1.0.0");
    }

    #[test]
    fn unpinned_line_has_any_version() {
        let r = RequirementSpec::new("foo --hash=sha256:abcd");
        assert_eq!(r.name(), "foo");
        assert_eq!(r.version(), ANY_VERSION);
        assert!(!r.is_pinned());
    }

    #[test]
    fn extras_and_markers_are_not_part_of_name_or_version() {
        let r = RequirementSpec::new("uvicorn[standard]==0.29.0; python_version >= \"3.9\"");
        assert_eq!(r.name(), "uvicorn");
        assert_eq!(r.version(), "0.29.0");

        let r = RequirementSpec::new("torch==2.1.2+cu121 ; sys_platform == \"linux\"");
        assert_eq!(r.name(), "torch");
        assert_eq!(r.version(), "2.1.2+cu121");
    }

    #[test]
    fn source_kept_verbatim() {
        let line = "pkg-name==3.2 --hash=sha256:AA --hash=sha256:bb";
        let r = RequirementSpec::new(line);
        assert_eq!(r.source(), line);
    }

    #[test]
    fn sha256_hashes_collected_lowercase() {
        let r = RequirementSpec::new("pkg==3.2 --hash=sha256:AA --hash=md5:zz --hash=sha256:bb");
        assert_eq!(r.sha256_hashes(), vec!["aa", "bb"]);
        assert!(RequirementSpec::new("pkg==3.2").sha256_hashes().is_empty());
    }

    #[test]
    fn version_stops_at_comma_and_backslash() {
        let r = RequirementSpec::new("pkg==1.2,!=1.3");
        assert_eq!(r.version(), "1.2");
        let r = RequirementSpec::new("pkg==4.5\\");
        assert_eq!(r.version(), "4.5");
    }

    #[test]
    fn arbitrary_equality_operator() {
        let r = RequirementSpec::new("legacy===1.0-custom");
        assert_eq!(r.name(), "legacy");
        assert_eq!(r.version(), "1.0-custom");
    }
}
