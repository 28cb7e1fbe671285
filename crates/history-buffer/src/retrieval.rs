//! Incremental Retrieval Protocol
//!
//! Cursor-based "everything new since X" reads on top of the store and
//! the range extractor.

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::rollover::sub_rollover_max;
use crate::store::Store;

/// How a read handles more new elements than it may return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadMode {
    /// Return the newest `amount` elements, skipping any older backlog
    #[default]
    Windowed,
    /// Resume right after the previous read, serving the backlog in order
    Continuous,
}

impl<T> Store<T> {
    /// Elements inserted since `cursor` that are still live
    pub(crate) fn new_data_amount(&self, cursor: u64) -> usize {
        let since = sub_rollover_max(self.base_id, cursor);
        usize::try_from(since).map_or(self.count, |since| since.min(self.count))
    }
}

impl<T: Clone> Store<T> {
    /// Append the next window for `cursor` to `target` and advance `cursor`.
    ///
    /// Returns the number of elements appended.
    pub(crate) fn read_window(
        &self,
        target: &mut Vec<T>,
        amount: usize,
        cursor: &mut u64,
        mode: ReadMode,
        exact: bool,
    ) -> usize {
        let base_id = self.base_id;

        if amount == 0 {
            *cursor = base_id;
            return 0;
        }

        if exact && self.new_data_amount(*cursor) < amount {
            trace!(cursor = *cursor, amount, "Not enough new data for exact read");
            return 0;
        }

        let available = if *cursor > 0 && *cursor <= base_id {
            usize::try_from(sub_rollover_max(base_id, *cursor)).unwrap_or(usize::MAX)
        } else {
            if *cursor > base_id {
                warn!(
                    cursor = *cursor,
                    base_id, "Cursor ahead of buffer, reading newest elements"
                );
            }
            amount
        };
        let available = available.min(self.count);

        if available == 0 {
            *cursor = base_id;
            return 0;
        }

        let (start, end) = match mode {
            ReadMode::Windowed => (0, available.min(amount)),
            ReadMode::Continuous => (available.saturating_sub(amount), available),
        };

        let copied = self.extract(target, start, end);
        *cursor = sub_rollover_max(base_id, start as u64);

        trace!(copied, start, end, cursor = *cursor, ?mode, "Read window");
        copied
    }
}
