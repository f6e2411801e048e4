use crate::domain::model::{AnimalId, AnimalRecord};
use crate::domain::ports::AnimalLookup;
use crate::utils::error::{HerdError, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone)]
struct Ancestor {
    record: AnimalRecord,
    generation: u32,
}

/// Every animal reachable from a root through recorded parents, the root
/// included. Built fresh for one resolution and never shared.
#[derive(Debug, Clone)]
pub struct AncestryMap {
    root: AnimalId,
    members: HashMap<AnimalId, Ancestor>,
    order: Vec<AnimalId>,
}

impl AncestryMap {
    fn new(root: AnimalId) -> Self {
        Self {
            root,
            members: HashMap::new(),
            order: Vec::new(),
        }
    }

    fn insert(&mut self, id: AnimalId, record: AnimalRecord, generation: u32) {
        self.order.push(id);
        self.members.insert(id, Ancestor { record, generation });
    }

    pub fn root(&self) -> AnimalId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: AnimalId) -> bool {
        self.members.contains_key(&id)
    }

    pub fn get(&self, id: AnimalId) -> Option<&AnimalRecord> {
        self.members.get(&id).map(|ancestor| &ancestor.record)
    }

    /// Breadth-first distance from the root: 0 for the root, 1 for its
    /// parents and so on. Shared ancestors keep their shortest distance.
    pub fn generation(&self, id: AnimalId) -> Option<u32> {
        self.members.get(&id).map(|ancestor| ancestor.generation)
    }

    /// Ids in discovery order, root first.
    pub fn ids(&self) -> &[AnimalId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnimalId, &AnimalRecord)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.members.get(id).map(|ancestor| (*id, &ancestor.record)))
    }

    /// Everything except the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &AnimalRecord> + '_ {
        self.iter()
            .filter(|(id, _)| *id != self.root)
            .map(|(_, record)| record)
    }

    pub fn into_records(mut self) -> Vec<AnimalRecord> {
        self.order
            .iter()
            .filter_map(|id| self.members.remove(id).map(|ancestor| ancestor.record))
            .collect()
    }
}

impl Serialize for AncestryMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (id, record) in self.iter() {
            map.serialize_entry(&id.to_string(), record)?;
        }
        map.end()
    }
}

pub struct AncestryResolver<'a, L: AnimalLookup + ?Sized> {
    lookup: &'a L,
}

impl<'a, L: AnimalLookup + ?Sized> AncestryResolver<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self { lookup }
    }

    /// Breadth-first walk over father/mother references starting at `root`.
    ///
    /// Each id is looked up at most once; the map doubles as the visited
    /// set, so shared ancestors and cyclic parentage terminate. A parent id
    /// the store does not know truncates that branch. A missing root fails
    /// with [`HerdError::RootNotFound`].
    pub async fn resolve(&self, root: AnimalId) -> Result<AncestryMap> {
        let mut ancestry = AncestryMap::new(root);
        let mut queue = VecDeque::from([(root, 0u32)]);

        while let Some((current, generation)) = queue.pop_front() {
            if ancestry.contains(current) {
                continue;
            }

            let Some(record) = self.lookup.find_by_id(current).await? else {
                if current == root {
                    return Err(HerdError::RootNotFound { id: root });
                }
                tracing::warn!("Dangling parent reference {} while resolving {}", current, root);
                continue;
            };

            tracing::debug!(
                "Ancestry of {}: found {} at generation {}",
                root,
                current,
                generation
            );

            queue.extend(record.parents().map(|parent| (parent, generation + 1)));
            ancestry.insert(current, record, generation);
        }

        tracing::debug!("Ancestry of {} resolved with {} members", root, ancestry.len());
        Ok(ancestry)
    }
}

pub async fn resolve_ancestry<L: AnimalLookup + ?Sized>(
    root: AnimalId,
    lookup: &L,
) -> Result<AncestryMap> {
    AncestryResolver::new(lookup).resolve(root).await
}
