// Diff engine: decides which local albums have no counterpart under the
// remote target folder. Pure, no I/O.

use std::collections::HashSet;

/// Return every name of `local` that is absent from `remote`, keeping the
/// order of `local`. Matching is exact and case-sensitive.
///
/// An empty result means there is nothing to sync.
pub fn compute_missing<S: AsRef<str>>(local: &[String], remote: &[S]) -> Vec<String> {
    let remote: HashSet<&str> = remote.iter().map(AsRef::as_ref).collect();
    local
        .iter()
        .filter(|name| !remote.contains(name.as_str()))
        .cloned()
        .collect()
}
