//! Thread-Safe History Buffer

use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::config::{BufferConfig, DEFAULT_CAPACITY};
use crate::error::{BufferError, ConfigError};
use crate::retrieval::ReadMode;
use crate::store::Store;

/// Fixed-capacity history of the most recent samples.
///
/// One producer path inserts, any number of consumers read. Each consumer
/// keeps its own cursor, a snapshot of the buffer's insertion counter, and
/// passes it back to receive only what was inserted since.
///
/// ```
/// use history_buffer::{ReadMode, RingBuffer};
///
/// let buffer = RingBuffer::new(5);
/// buffer.insert_many([10, 20, 30, 40, 50, 60]);
///
/// let mut cursor = 0;
/// let window = buffer.get_window(5, &mut cursor, ReadMode::Windowed, false);
/// assert_eq!(window, vec![20, 30, 40, 50, 60]);
///
/// buffer.insert(70);
/// let window = buffer.get_window(5, &mut cursor, ReadMode::Continuous, false);
/// assert_eq!(window, vec![70]);
/// ```
pub struct RingBuffer<T> {
    inner: RwLock<Store<T>>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Create a new buffer holding up to `capacity` elements
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "History buffer capacity must be > 0");
        debug!("Creating history buffer with capacity {}", capacity);
        Self {
            inner: RwLock::new(Store::new(capacity)),
            capacity,
        }
    }

    /// Create a buffer with default capacity (3000 samples)
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Create a buffer from configuration
    ///
    /// # Panics
    ///
    /// Panics if the configured capacity is zero, see [`Self::try_from_config`].
    pub fn from_config(config: &BufferConfig) -> Self {
        Self::new(config.capacity)
    }

    /// Create a buffer from configuration, rejecting invalid settings
    pub fn try_from_config(config: &BufferConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config.capacity))
    }

    fn read(&self) -> RwLockReadGuard<'_, Store<T>> {
        // Counters are consistent whenever user code runs, so a poisoned lock is still usable
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Store<T>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a value, overwriting the oldest one if full
    pub fn insert(&self, value: T) {
        self.write().insert(value);
    }

    /// Insert values in order as one batch
    ///
    /// `values` is collected before the write lock is taken, so the
    /// iterator may read from this buffer and a slow iterator does not
    /// block readers.
    pub fn insert_many<I>(&self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        let values: Vec<T> = values.into_iter().collect();
        let mut store = self.write();
        for value in values {
            store.insert(value);
        }
    }

    /// Apply `f` to the element `pos` positions before the newest one
    pub fn with_position<R>(&self, pos: usize, f: impl FnOnce(&T) -> R) -> Result<R, BufferError> {
        let store = self.read();
        store.backward(pos).map(f)
    }

    /// Number of elements inserted since `cursor` that are still held
    pub fn get_new_data_amount(&self, cursor: u64) -> usize {
        self.read().new_data_amount(cursor)
    }

    /// Current cursor value; reading with it returns only later insertions
    ///
    /// A buffer that has never been written returns 0, which every read
    /// treats as "no cursor". Such a snapshot cannot resume: the first read
    /// with it returns the newest `amount` elements, not everything inserted
    /// since. Take the snapshot after at least one insertion.
    pub fn base_id(&self) -> u64 {
        self.read().base_id
    }

    /// Number of elements currently held
    pub fn size(&self) -> usize {
        self.read().count
    }

    /// Maximum number of elements held
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Check if every slot holds a live element
    pub fn is_full(&self) -> bool {
        self.size() == self.capacity
    }

    /// Get fill ratio (0.0 to 1.0)
    pub fn fill_ratio(&self) -> f64 {
        self.size() as f64 / self.capacity as f64
    }

    /// Drop all held elements. Cursors stay valid and see only later insertions.
    pub fn clear(&self) {
        let mut store = self.write();
        debug!("Clearing {} elements at base id {}", store.count, store.base_id);
        store.clear();
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Element `id` positions after the oldest one
    pub fn get(&self, id: usize) -> Result<T, BufferError> {
        self.read().forward(id).cloned()
    }

    /// Element `pos` positions before the newest one
    pub fn get_position(&self, pos: usize) -> Result<T, BufferError> {
        self.read().backward(pos).cloned()
    }

    /// Read up to `amount` elements inserted since `cursor`, oldest first,
    /// and advance `cursor` past them.
    ///
    /// A `cursor` of 0, or one not issued by this buffer, reads the newest
    /// elements. With `exact`, returns nothing and leaves `cursor` untouched
    /// unless `amount` new elements are available.
    pub fn get_window(&self, amount: usize, cursor: &mut u64, mode: ReadMode, exact: bool) -> Vec<T> {
        let store = self.read();
        let mut window = Vec::with_capacity(amount.min(store.count));
        store.read_window(&mut window, amount, cursor, mode, exact);
        window
    }

    /// Like [`Self::get_window`] but appends to `target`.
    ///
    /// Returns the number of elements appended. No allocation happens if
    /// `target` has room for `amount` more elements.
    pub fn get_window_into(
        &self,
        target: &mut Vec<T>,
        amount: usize,
        cursor: &mut u64,
        mode: ReadMode,
        exact: bool,
    ) -> usize {
        self.read().read_window(target, amount, cursor, mode, exact)
    }

    /// The newest `amount` elements, oldest first
    pub fn latest(&self, amount: usize) -> Vec<T> {
        let mut cursor = 0;
        self.get_window(amount, &mut cursor, ReadMode::Windowed, false)
    }
}

impl<T: Clone> Clone for RingBuffer<T> {
    fn clone(&self) -> Self {
        let store = Store::clone(&self.read());
        Self {
            inner: RwLock::new(store),
            capacity: self.capacity,
        }
    }
}

impl<T> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.read();
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity)
            .field("size", &store.count)
            .field("base_id", &store.base_id)
            .finish()
    }
}
