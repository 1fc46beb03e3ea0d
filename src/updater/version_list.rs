//! Version list rewriting shared by the Travis and GitHub Actions updaters

use indexmap::IndexSet;

use crate::release::GoVersion;
use crate::yaml::{Editor, ScalarStyle, Sequence, scalar};

/// What happens to a list that pins exactly one version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinglePin {
    /// Swap the pinned version out for the target
    Replace,
    /// Keep it and append the target, as for any other list
    Keep,
}

/// Deduplicate the versions of `seq` (first occurrence wins) and make sure
/// `target` is present exactly once. Items that are not scalars are left
/// alone; callers validate item types first.
///
/// Returns whether any edit was recorded.
pub fn merge_versions(
    editor: &mut Editor<'_>,
    seq: &Sequence,
    target: &GoVersion,
    single_pin: SinglePin,
) -> bool {
    let mut seen = IndexSet::new();
    let mut duplicates = Vec::new();
    for (index, item) in seq.items.iter().enumerate() {
        let Some(scalar) = item.node.as_scalar() else {
            continue;
        };
        if !seen.insert(scalar.value.as_str()) {
            duplicates.push(index);
        }
    }

    let has_target = seen.contains(target.as_str());
    if has_target && duplicates.is_empty() {
        return false;
    }

    if !has_target && single_pin == SinglePin::Replace && seen.len() == 1 {
        let first = &seq.items[0];
        let style = first
            .node
            .as_scalar()
            .map_or(ScalarStyle::Plain, |s| s.style);
        editor.replace(&first.node, scalar::render(target.as_str(), style));
        for index in 1..seq.items.len() {
            editor.remove_item(seq, index);
        }
        return true;
    }

    for &index in &duplicates {
        editor.remove_item(seq, index);
    }

    if !has_target {
        let last_kept = (0..seq.items.len())
            .rev()
            .find(|index| !duplicates.contains(index));
        let style = last_kept
            .and_then(|index| seq.items[index].node.as_scalar())
            .map_or(ScalarStyle::Plain, |s| s.style);
        editor.append_item(seq, last_kept, &scalar::render(target.as_str(), style));
    }

    true
}
