//! Named-object store shared by pipeline steps

use super::{PipelineError, PipelineResult};
use std::collections::BTreeMap;
use voxkit_core::{Channel, Mask, ObjectCollection};

/// A value held in a [`Context`]
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Channel(Channel),
    Mask(Mask),
    Objects(ObjectCollection),
}

impl Entry {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Entry::Channel(_) => "channel",
            Entry::Mask(_) => "mask",
            Entry::Objects(_) => "object collection",
        }
    }
}

impl From<Channel> for Entry {
    fn from(channel: Channel) -> Self {
        Entry::Channel(channel)
    }
}

impl From<Mask> for Entry {
    fn from(mask: Mask) -> Self {
        Entry::Mask(mask)
    }
}

impl From<ObjectCollection> for Entry {
    fn from(objects: ObjectCollection) -> Self {
        Entry::Objects(objects)
    }
}

/// Named channels, masks and object collections.
///
/// Steps read their inputs by name and write results back by name.
/// Reads borrow; [`Context::duplicate`] hands out an owned copy for callers
/// that need to modify a value without touching the stored one.
///
/// # Example
///
/// ```
/// use voxkit::pipeline::Context;
/// use voxkit::{Extent, Mask};
///
/// let mut ctx = Context::new();
/// ctx.insert("cells", Mask::new(Extent::new(4, 4, 1).unwrap()));
/// assert_eq!(ctx.mask("cells").unwrap().count_on(), 0);
/// assert!(ctx.channel("cells").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    entries: BTreeMap<String, Entry>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, returning the one it replaced
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Entry>) -> Option<Entry> {
        self.entries.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Entry> {
        self.entries.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// The named entry, created with `create` if absent
    pub fn get_or_create(&mut self, name: &str, create: impl FnOnce() -> Entry) -> &mut Entry {
        self.entries.entry(name.to_string()).or_insert_with(create)
    }

    /// Owned copy of the named entry
    pub fn duplicate(&self, name: &str) -> PipelineResult<Entry> {
        self.entry(name).cloned()
    }

    fn entry(&self, name: &str) -> PipelineResult<&Entry> {
        self.entries
            .get(name)
            .ok_or_else(|| PipelineError::MissingEntry(name.to_string()))
    }

    pub fn channel(&self, name: &str) -> PipelineResult<&Channel> {
        match self.entry(name)? {
            Entry::Channel(channel) => Ok(channel),
            other => Err(wrong_kind(name, "channel", other)),
        }
    }

    pub fn mask(&self, name: &str) -> PipelineResult<&Mask> {
        match self.entry(name)? {
            Entry::Mask(mask) => Ok(mask),
            other => Err(wrong_kind(name, "mask", other)),
        }
    }

    pub fn objects(&self, name: &str) -> PipelineResult<&ObjectCollection> {
        match self.entry(name)? {
            Entry::Objects(objects) => Ok(objects),
            other => Err(wrong_kind(name, "object collection", other)),
        }
    }

    /// Mask looked up by an optional name
    pub fn optional_mask(&self, name: Option<&str>) -> PipelineResult<Option<&Mask>> {
        name.map(|n| self.mask(n)).transpose()
    }
}

fn wrong_kind(name: &str, expected: &'static str, actual: &Entry) -> PipelineError {
    PipelineError::WrongKind {
        name: name.to_string(),
        expected,
        actual: actual.kind_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxkit_core::{Extent, Voxels};

    fn extent() -> Extent {
        Extent::new(3, 3, 1).unwrap()
    }

    #[test]
    fn test_typed_lookup() {
        let mut ctx = Context::new();
        ctx.insert("raw", Channel::from_u8(Voxels::filled(extent(), 5)));
        ctx.insert("fg", Mask::new(extent()));

        assert!(ctx.channel("raw").is_ok());
        assert!(ctx.mask("fg").is_ok());
        assert!(matches!(ctx.mask("raw"), Err(PipelineError::WrongKind { .. })));
        assert!(matches!(ctx.objects("nope"), Err(PipelineError::MissingEntry(_))));
        assert_eq!(ctx.names().collect::<Vec<_>>(), vec!["fg", "raw"]);
    }

    #[test]
    fn test_duplicate_is_independent() {
        let mut ctx = Context::new();
        ctx.insert("fg", Mask::new(extent()));
        let Entry::Mask(mut copy) = ctx.duplicate("fg").unwrap() else {
            panic!("expected a mask");
        };
        copy.set(1, 1, 0, true);
        assert_eq!(ctx.mask("fg").unwrap().count_on(), 0);
        assert_eq!(copy.count_on(), 1);
    }

    #[test]
    fn test_get_or_create() {
        let mut ctx = Context::new();
        let created = ctx.get_or_create("objs", || ObjectCollection::new().into());
        assert_eq!(created.kind_name(), "object collection");
        ctx.insert("fg", Mask::new(extent()));
        let existing = ctx.get_or_create("fg", || ObjectCollection::new().into());
        assert_eq!(existing.kind_name(), "mask");
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_insert_replaces() {
        let mut ctx = Context::new();
        assert!(ctx.insert("a", Mask::new(extent())).is_none());
        let old = ctx.insert("a", ObjectCollection::new());
        assert!(matches!(old, Some(Entry::Mask(_))));
        assert!(ctx.remove("a").is_some());
        assert!(ctx.is_empty());
    }
}
