// Selection stage: narrows the missing folders to the ones the operator
// wants. The interactive prompt lives in `ui::PromptSelector`.

use std::io;

/// Chooses a subset of the candidate folders.
///
/// Implementations return the chosen names in candidate order.
pub trait Selector {
    fn select_subset(&mut self, candidates: &[String]) -> io::Result<Vec<String>>;
}

/// Identity selection, used when `--select` is off.
#[derive(Debug, Default)]
pub struct AllFolders;

impl Selector for AllFolders {
    fn select_subset(&mut self, candidates: &[String]) -> io::Result<Vec<String>> {
        Ok(candidates.to_vec())
    }
}

/// Map picked indices back to names, in candidate order, ignoring
/// out-of-range and duplicate indices.
pub fn pick_in_order(candidates: &[String], picked: &[usize]) -> Vec<String> {
    candidates
        .iter()
        .enumerate()
        .filter(|(i, _)| picked.contains(i))
        .map(|(_, name)| name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn all_folders_is_identity() {
        let candidates = names(&["A", "C"]);
        assert_eq!(AllFolders.select_subset(&candidates).unwrap(), candidates);
    }

    #[test]
    fn picked_names_follow_candidate_order() {
        let candidates = names(&["A", "B", "C", "D"]);
        assert_eq!(pick_in_order(&candidates, &[3, 0, 2]), names(&["A", "C", "D"]));
    }

    #[test]
    fn stray_indices_are_ignored() {
        let candidates = names(&["A", "B"]);
        assert_eq!(pick_in_order(&candidates, &[1, 1, 7]), names(&["B"]));
    }
}
