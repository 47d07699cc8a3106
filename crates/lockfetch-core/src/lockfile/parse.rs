//! Parse lockfile text into requirement specs and global option tokens.

use super::error::ParseError;
use super::requirement::RequirementSpec;
use super::Lockfile;

/// Line prefixes that mark a global option rather than a requirement.
pub const GLOBAL_OPTION_PREFIXES: [&str; 4] = [
    "--extra-index-url",
    "--index-url",
    "--find-links",
    "--trusted-host",
];

const CONTINUATION: char = '\\';

/// True if a logical line configures the fetch command globally.
pub fn is_global_option(line: &str) -> bool {
    GLOBAL_OPTION_PREFIXES
        .iter()
        .any(|prefix| line.starts_with(prefix))
}

/// Parse lockfile text.
///
/// Blank lines and `#` comments are skipped (also between continued lines).
/// A line ending in `\` is joined to the next one: each segment is trimmed,
/// the marker dropped, and segments are joined with a single space. A
/// continuation still open at end of input becomes the final logical line.
/// Requirement lines are never validated here; the fetch command decides.
pub fn parse_str(text: &str) -> Result<Lockfile, ParseError> {
    let mut lockfile = Lockfile::default();
    let mut pending: Vec<&str> = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(head) = line.strip_suffix(CONTINUATION) {
            let head = head.trim();
            if !head.is_empty() {
                pending.push(head);
            }
            continue;
        }
        pending.push(line);
        let logical = pending.join(" ");
        pending.clear();
        classify_into(&mut lockfile, logical)?;
    }

    if !pending.is_empty() {
        let logical = pending.join(" ");
        tracing::debug!(line = %logical, "lockfile ended inside a continuation");
        classify_into(&mut lockfile, logical)?;
    }

    Ok(lockfile)
}

fn classify_into(lockfile: &mut Lockfile, logical: String) -> Result<(), ParseError> {
    if logical.is_empty() {
        return Ok(());
    }
    if is_global_option(&logical) {
        let tokens = shlex::split(&logical).ok_or_else(|| ParseError::InvalidOption {
            line: logical.clone(),
        })?;
        lockfile.global_options.extend(tokens);
    } else {
        lockfile.requirements.push(RequirementSpec::new(logical));
    }
    Ok(())
}
