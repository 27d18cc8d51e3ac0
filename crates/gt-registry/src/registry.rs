//! The `DestinationRegistry`: ordered storage with id lookup.

use std::collections::HashMap;

use crate::destination::{Destination, DestinationDecl, KindTag};
use crate::{RegistryError, RegistryResult};

/// Holds every known destination in registration order.
///
/// `entries` keeps insertion order for [`list_by_kind`](Self::list_by_kind);
/// `by_id` maps an id to its slot.  Re-registering an id replaces the
/// destination in place, so it keeps its original position.
#[derive(Clone, Debug, Default)]
pub struct DestinationRegistry {
    entries: Vec<Destination>,
    by_id: HashMap<String, usize>,
}

impl DestinationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `decl` and insert it, replacing any destination with the
    /// same id.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidDestination`] if the id is empty, the network
    /// entry or final coordinates are missing, or an unlock destination has
    /// no unlock conditions.
    pub fn register(&mut self, decl: DestinationDecl) -> RegistryResult<()> {
        let destination = Destination::try_from(decl)?;
        self.insert(destination);
        Ok(())
    }

    /// Register every declaration, stopping at the first invalid one.
    pub fn register_all<I>(&mut self, decls: I) -> RegistryResult<()>
    where
        I: IntoIterator<Item = DestinationDecl>,
    {
        decls.into_iter().try_for_each(|d| self.register(d))
    }

    fn insert(&mut self, destination: Destination) {
        match self.by_id.get(&destination.id) {
            Some(&slot) => {
                tracing::debug!(id = %destination.id, "destination replaced");
                self.entries[slot] = destination;
            }
            None => {
                tracing::debug!(id = %destination.id, kind = %destination.kind.tag(), "destination registered");
                self.by_id.insert(destination.id.clone(), self.entries.len());
                self.entries.push(destination);
            }
        }
    }

    pub fn lookup(&self, id: &str) -> RegistryResult<&Destination> {
        self.by_id
            .get(id)
            .map(|&slot| &self.entries[slot])
            .ok_or_else(|| RegistryError::NotFound(id.to_owned()))
    }

    /// Destinations of `kind` in registration order.
    ///
    /// The iterator is lazy and `Clone`; cloning it (or calling this again)
    /// restarts the sequence from the beginning.
    pub fn list_by_kind(&self, kind: KindTag) -> ByKind<'_> {
        ByKind { inner: self.entries.iter(), kind }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Iterator returned by [`DestinationRegistry::list_by_kind`].
#[derive(Clone)]
pub struct ByKind<'a> {
    inner: std::slice::Iter<'a, Destination>,
    kind: KindTag,
}

impl<'a> Iterator for ByKind<'a> {
    type Item = &'a Destination;

    fn next(&mut self) -> Option<&'a Destination> {
        let kind = self.kind;
        self.inner.find(|d| d.kind.tag() == kind)
    }
}
