use indexmap::IndexSet;

use crate::error::{ChartError, ChartResult};

use super::LegendItemInput;

#[must_use]
pub fn initial_shown_targets(items: &[LegendItemInput]) -> IndexSet<String> {
    items.iter().map(|item| item.key.clone()).collect()
}

/// Flips the visibility of one legend key and returns whether it is now shown.
///
/// Re-shown keys take their place in `order` again, so the set keeps the
/// legend's ordering regardless of click history.
pub fn toggle_target<'a>(
    shown: &mut IndexSet<String>,
    order: impl IntoIterator<Item = &'a str>,
    key: &str,
) -> ChartResult<bool> {
    let order: Vec<&str> = order.into_iter().collect();
    if !order.contains(&key) {
        return Err(ChartError::InvalidObjectProvided {
            key: key.to_owned(),
        });
    }

    if shown.shift_remove(key) {
        return Ok(false);
    }

    let mut rebuilt = IndexSet::with_capacity(shown.len() + 1);
    for candidate in order {
        if candidate == key || shown.contains(candidate) {
            rebuilt.insert(candidate.to_owned());
        }
    }
    *shown = rebuilt;
    Ok(true)
}
