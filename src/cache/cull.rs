//! Culling Module
//!
//! Keeps the number of stored entries bounded by deleting a positional sample
//! of the store listing once the configured maximum is reached.
//!
//! The sample follows whatever order the store lists names in. It is an
//! approximately uniform pick, not a recency or size based one.

use tracing::{debug, info, warn};

use crate::cache::LISTING_LIMIT;
use crate::store::ObjectStore;

// == Select Doomed ==
/// Picks the names to delete from a listing.
///
/// A `frequency` of 0 selects every name; N selects positions 0, N, 2N, ...
pub fn select_doomed(names: Vec<String>, frequency: usize) -> Vec<String> {
    if frequency == 0 {
        return names;
    }
    names.into_iter().step_by(frequency).collect()
}

// == Cull ==
/// Runs one culling pass against `store` if `max_entries` is set.
///
/// Returns how many names were submitted for deletion.
pub async fn cull<S: ObjectStore + ?Sized>(
    store: &S,
    location: &str,
    max_entries: usize,
    frequency: usize,
) -> usize {
    if max_entries == 0 {
        return 0;
    }
    sweep(store, location, max_entries, frequency).await
}

// == Sweep ==
/// Lists `location` and, once at least `threshold` names are listed, deletes
/// the sample chosen by [`select_doomed`].
///
/// A threshold of 0 always deletes, which is how `clear` empties a cache.
/// Listing or delete failures are logged and otherwise ignored.
pub async fn sweep<S: ObjectStore + ?Sized>(
    store: &S,
    location: &str,
    threshold: usize,
    frequency: usize,
) -> usize {
    let names = match store.list_objects(location, LISTING_LIMIT).await {
        Ok(names) => names,
        Err(e) => {
            warn!("Skipping cull, listing '{}' failed: {}", location, e);
            return 0;
        }
    };

    if names.len() < threshold {
        debug!("{} entries under '{}', no cull needed", names.len(), location);
        return 0;
    }

    let listed = names.len();
    let doomed = select_doomed(names, frequency);
    if doomed.is_empty() {
        return 0;
    }

    let count = doomed.len();
    info!(
        "Culling {} of {} entries under '{}' (frequency {})",
        count, listed, location, frequency
    );
    if let Err(e) = store.delete_objects(&doomed).await {
        warn!("Cull delete under '{}' partially failed: {}", location, e);
    }
    count
}
