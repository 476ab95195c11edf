use std::fmt;
use std::marker::PhantomData;

/// Reserved handle value. Never refers to a live resource.
pub const INVALID_ID: u32 = 0;

/// Marker for the kind of resource a handle points at.
pub trait ResourceKind {
    const NAME: &'static str;
}

/// Shader program resources.
#[derive(Debug)]
pub enum ShaderKind {}

/// 2D texture resources.
#[derive(Debug)]
pub enum TextureKind {}

impl ResourceKind for ShaderKind {
    const NAME: &'static str = "shader";
}

impl ResourceKind for TextureKind {
    const NAME: &'static str = "texture";
}

/// Opaque index into a [`ResourceTable`] of kind `K`.
///
/// Handles are stable for the lifetime of the table that issued them. Index 0
/// is the sentinel and is what `Default` produces.
pub struct Handle<K> {
    index: u32,
    _kind: PhantomData<fn() -> K>,
}

pub type ShaderId = Handle<ShaderKind>;
pub type TextureId = Handle<TextureKind>;

impl<K> Handle<K> {
    pub const INVALID: Self = Self::from_index(INVALID_ID);

    pub const fn from_index(index: u32) -> Self {
        Self {
            index,
            _kind: PhantomData,
        }
    }

    pub const fn index(self) -> u32 {
        self.index
    }

    pub const fn is_invalid(self) -> bool {
        self.index == INVALID_ID
    }
}

// Manual impls: derives would require `K: Clone` etc. on the marker.
impl<K> Clone for Handle<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Handle<K> {}

impl<K> PartialEq for Handle<K> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<K> Eq for Handle<K> {}

impl<K> PartialOrd for Handle<K> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for Handle<K> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index.cmp(&other.index)
    }
}

impl<K> std::hash::Hash for Handle<K> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<K> Default for Handle<K> {
    fn default() -> Self {
        Self::INVALID
    }
}

impl<K: ResourceKind> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", K::NAME, self.index)
    }
}

/// A handle was out of range for its table, or named a non-live slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} handle {index}")]
pub struct InvalidHandle {
    pub kind: &'static str,
    pub index: u32,
}

/// One entry of a resource table.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    /// The inert record at index 0.
    Sentinel,
    Live(T),
}

impl<T> Slot<T> {
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }

    pub fn live(&self) -> Option<&T> {
        match self {
            Self::Live(record) => Some(record),
            Self::Sentinel => None,
        }
    }
}

/// Append-only table mapping handles to records.
///
/// # Invariants
/// - Slot 0 is always [`Slot::Sentinel`].
/// - Every handle ever returned by [`allocate`](Self::allocate) is `< len()`.
/// - Handles strictly increase in allocation order and are never reused.
pub struct ResourceTable<K, T> {
    slots: Vec<Slot<T>>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ResourceKind, T> ResourceTable<K, T> {
    pub fn new() -> Self {
        Self {
            slots: vec![Slot::Sentinel],
            _kind: PhantomData,
        }
    }

    /// Append a live record and return its handle.
    pub fn allocate(&mut self, record: T) -> Handle<K> {
        let index = u32::try_from(self.slots.len())
            .unwrap_or_else(|_| panic!("{} table exceeded u32::MAX entries", K::NAME));
        self.slots.push(Slot::Live(record));
        Handle::from_index(index)
    }

    /// Look up a slot. The sentinel is returned for handle 0.
    pub fn get(&self, handle: Handle<K>) -> Result<&Slot<T>, InvalidHandle> {
        self.slots
            .get(handle.index as usize)
            .ok_or_else(|| Self::invalid(handle))
    }

    /// Look up a live record; the sentinel and out-of-range handles both fail.
    pub fn get_live(&self, handle: Handle<K>) -> Result<&T, InvalidHandle> {
        self.get(handle)?.live().ok_or_else(|| Self::invalid(handle))
    }

    /// Number of slots, including the sentinel.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false: the sentinel occupies slot 0.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.slots.len() - 1
    }

    pub fn iter_live(&self) -> impl Iterator<Item = (Handle<K>, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.live().map(|r| (Handle::from_index(i as u32), r)))
    }

    /// Remove every record, leaving only the sentinel. Used at teardown.
    pub(crate) fn drain_live(&mut self) -> impl Iterator<Item = T> + '_ {
        self.slots.drain(1..).filter_map(|slot| match slot {
            Slot::Live(record) => Some(record),
            Slot::Sentinel => None,
        })
    }

    fn invalid(handle: Handle<K>) -> InvalidHandle {
        InvalidHandle {
            kind: K::NAME,
            index: handle.index,
        }
    }
}

impl<K: ResourceKind, T> Default for ResourceTable<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ResourceKind, T: fmt::Debug> fmt::Debug for ResourceTable<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceTable")
            .field("kind", &K::NAME)
            .field("slots", &self.slots)
            .finish()
    }
}
