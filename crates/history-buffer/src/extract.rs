//! Range Extractor
//!
//! Copies a logical window, counted back from the newest element, out of
//! the physical slots in chronological order.

use tracing::error;

use crate::rollover::sub_rollover;
use crate::store::Store;

impl<T: Clone> Store<T> {
    /// Append the elements `end` back (oldest) up to `start` back (exclusive)
    /// from the newest element to `target`, oldest first.
    ///
    /// Returns the number of elements appended. Requires
    /// `start < end <= count`; anything else is an internal arithmetic bug
    /// and panics after being logged.
    pub(crate) fn extract(&self, target: &mut Vec<T>, start: usize, end: usize) -> usize {
        if start >= end || end > self.count {
            invariant_violation(format_args!(
                "window [{start}, {end}) not backed by {} live elements",
                self.count
            ));
        }

        let offset = sub_rollover(self.newest_slot(), end - 1, self.last_slot());
        let requested = end - start;
        let len = requested.min(self.capacity);

        // Run may cross the physical end of the slots
        let until_end = self.capacity - offset;
        let (len1, len2) = if len > until_end {
            (until_end, len - until_end)
        } else {
            (len, 0)
        };

        target.extend_from_slice(&self.storage[offset..offset + len1]);
        target.extend_from_slice(&self.storage[..len2]);

        let copied = len1 + len2;
        if copied != requested {
            invariant_violation(format_args!(
                "extracted {copied} elements for a window of {requested}"
            ));
        }

        copied
    }
}

#[cold]
fn invariant_violation(details: std::fmt::Arguments<'_>) -> ! {
    error!("History buffer invariant violated: {}", details);
    panic!("history buffer invariant violated: {details}");
}
