//! Stand-in for the external fetch command, written as a `/bin/sh` script.
//!
//! Accepts the same argv the real command gets (`--dest DIR ... -r FILE`),
//! reads the single requirement from FILE and then:
//! - requirement mentions `sha256:bad`: prints a hash error on stderr, exits 1
//! - requirement mentions `cached`: exits 0 without writing anything
//! - otherwise: writes `{name_with_underscores}-{version}-py3-none-any.whl`
//!   into DIR containing the requirement line
//!
//! Every invocation appends its argv (one per line) to `DIR/.argv.log`.

use std::path::{Path, PathBuf};

use lockfetch_core::config::FetchCommandConfig;

const SCRIPT: &str = r#"
log=""
for a in "$@"; do log="$log$a
"; done
dest=""
req=""
while [ $# -gt 0 ]; do
  case "$1" in
    --dest) shift; dest="$1" ;;
    -r) shift; req="$1" ;;
  esac
  shift
done
printf '%s--\n' "$log" >> "$dest/.argv.log"
line=$(cat "$req")
spec=${line%% *}
name=${spec%%==*}
version=${spec#*==}
case "$line" in
  *sha256:bad*)
    echo "Collecting $name==$version" >&2
    echo "ERROR: THESE PACKAGES DO NOT MATCH THE HASHES FROM THE REQUIREMENTS FILE." >&2
    exit 1 ;;
  *cached*) exit 0 ;;
esac
wheel=$(echo "$name" | sed 's/-/_/g')
printf '%s' "$line" > "$dest/$wheel-$version-py3-none-any.whl"
"#;

/// Write the fake fetcher into `dir` and return a command config invoking it.
pub fn install(dir: &Path) -> FetchCommandConfig {
    let script: PathBuf = dir.join("fake-fetch.sh");
    std::fs::write(&script, SCRIPT).expect("write fake fetcher");
    FetchCommandConfig {
        program: "/bin/sh".to_string(),
        args: vec![script.display().to_string()],
    }
}
