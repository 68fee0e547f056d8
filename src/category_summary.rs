use std::collections::HashMap;

/// Share below which a category is folded into [`OTHERS_LABEL`], in percent.
pub const MINOR_SHARE_THRESHOLD: f64 = 10.0;

pub const OTHERS_LABEL: &str = "Others";

/// Collapses the long tail of a category frequency table in place.
///
/// Every entry whose share of the total is under [`MINOR_SHARE_THRESHOLD`]
/// percent is removed and its count added to a single `"Others"` entry.
/// Shares and the folded sum are both computed against the pre-removal
/// total. A non-empty table always comes out with exactly one `"Others"`
/// entry, count 0 when nothing was minor; an empty table is left untouched.
pub fn fold_minor_categories(counts: &mut HashMap<String, u64>) {
    if counts.is_empty() {
        return;
    }

    let total: u64 = counts.values().sum();

    // With an all-zero table the shares are not meaningful; nothing
    // classifies as minor and "Others" lands at 0.
    let minor_labels: Vec<String> = counts
        .iter()
        .filter(|(_, &count)| (count as f64 / total as f64) * 100.0 < MINOR_SHARE_THRESHOLD)
        .map(|(label, _)| label.clone())
        .collect();

    let mut folded = 0;
    for label in minor_labels {
        if let Some(count) = counts.remove(&label) {
            folded += count;
        }
    }

    counts.insert(OTHERS_LABEL.to_string(), folded);
}
