//! Acyclic, immutable views of the stored graph.
//!
//! The live graph is bidirectional (owner <-> collection, collection <-> item).
//! Snapshots follow every edge one level and drop the reverse edge, so they
//! can be cloned, serialized and compared freely. All projection happens in
//! [`GraphRows`]; nothing else builds nested snapshots.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use crate::db::models::{DbCollection, DbItem, DbMembership, DbOwner};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnerSnapshot {
    pub name: String,
    pub collections: Vec<CollectionSnapshot>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionSnapshot {
    pub name: String,
    pub items: Vec<ItemSnapshot>,
    /// `None` for shared collections, and whenever the snapshot was reached from its owner.
    pub owner: Option<OwnerSnapshot>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub name: String,
    pub collections: Vec<CollectionSnapshot>,
}

impl OwnerSnapshot {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: Vec::new(),
        }
    }
}

impl CollectionSnapshot {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
            owner: None,
        }
    }

    pub fn item_names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.name.as_str())
    }

    pub fn contains_item(&self, name: &str) -> bool {
        self.item_names().any(|n| n == name)
    }
}

impl ItemSnapshot {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: Vec::new(),
        }
    }

    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.iter().map(|c| c.name.as_str())
    }
}

impl PartialEq for OwnerSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for OwnerSnapshot {}

impl Hash for OwnerSnapshot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialEq for CollectionSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.item_names().eq(other.item_names())
    }
}

impl Eq for CollectionSnapshot {}

impl Hash for CollectionSnapshot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        for name in self.item_names() {
            name.hash(state);
        }
    }
}

impl PartialEq for ItemSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ItemSnapshot {}

impl Hash for ItemSnapshot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Rows loaded inside one store call, indexed for one-level projection.
pub(crate) struct GraphRows {
    items_by_collection: AHashMap<i64, Vec<ItemSnapshot>>,
    collections_by_item: AHashMap<i64, Vec<CollectionSnapshot>>,
}

impl GraphRows {
    /// `memberships` must already be in membership creation order.
    pub(crate) fn new(memberships: &[DbMembership]) -> Self {
        let mut items_by_collection: AHashMap<i64, Vec<ItemSnapshot>> = AHashMap::new();
        let mut collections_by_item: AHashMap<i64, Vec<CollectionSnapshot>> = AHashMap::new();
        for m in memberships {
            items_by_collection
                .entry(m.collection_id)
                .or_default()
                .push(ItemSnapshot::leaf(m.item_name.as_str()));
            collections_by_item
                .entry(m.item_id)
                .or_default()
                .push(CollectionSnapshot::leaf(m.collection_name.as_str()));
        }
        Self {
            items_by_collection,
            collections_by_item,
        }
    }

    fn items_of(&self, collection_id: i64) -> Vec<ItemSnapshot> {
        self.items_by_collection
            .get(&collection_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Owners with their collections; collections carry leaf items and no owner.
    pub(crate) fn owners(
        &self,
        owners: &[DbOwner],
        owned_collections: &[DbCollection],
    ) -> Vec<OwnerSnapshot> {
        owners
            .iter()
            .map(|owner| OwnerSnapshot {
                name: owner.name.clone(),
                collections: owned_collections
                    .iter()
                    .filter(|c| c.owner_id == Some(owner.id))
                    .map(|c| CollectionSnapshot {
                        name: c.name.clone(),
                        items: self.items_of(c.id),
                        owner: None,
                    })
                    .collect(),
            })
            .collect()
    }

    /// Collections with leaf items and, when owned, a leaf owner.
    pub(crate) fn collections(&self, collections: &[DbCollection]) -> Vec<CollectionSnapshot> {
        collections
            .iter()
            .map(|c| CollectionSnapshot {
                name: c.name.clone(),
                items: self.items_of(c.id),
                owner: c.owner_name.as_deref().map(OwnerSnapshot::leaf),
            })
            .collect()
    }

    /// Items with the names of the collections they belong to.
    pub(crate) fn items(&self, items: &[DbItem]) -> Vec<ItemSnapshot> {
        items
            .iter()
            .map(|item| ItemSnapshot {
                name: item.name.clone(),
                collections: self
                    .collections_by_item
                    .get(&item.id)
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashSet;
    use chrono::Utc;

    fn collection(id: i64, name: &str, owner: Option<(i64, &str)>) -> DbCollection {
        DbCollection {
            id,
            name: name.to_string(),
            owner_id: owner.map(|(id, _)| id),
            owner_name: owner.map(|(_, n)| n.to_string()),
            created_at: Utc::now(),
        }
    }

    fn membership(collection: (i64, &str), item: (i64, &str)) -> DbMembership {
        DbMembership {
            collection_id: collection.0,
            collection_name: collection.1.to_string(),
            item_id: item.0,
            item_name: item.1.to_string(),
        }
    }

    #[test]
    fn collection_equality_uses_ordered_item_names() {
        let mut a = CollectionSnapshot::leaf("Summer");
        a.items = vec![ItemSnapshot::leaf("Mojito"), ItemSnapshot::leaf("Daiquiri")];
        let mut b = a.clone();
        b.owner = Some(OwnerSnapshot::leaf("alice"));
        b.items[0].collections = vec![CollectionSnapshot::leaf("Other")];
        assert_eq!(a, b);

        let mut reordered = a.clone();
        reordered.items.reverse();
        assert_ne!(a, reordered);

        let set: AHashSet<CollectionSnapshot> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn owner_and_item_compare_by_name() {
        let mut alice = OwnerSnapshot::leaf("alice");
        alice.collections.push(CollectionSnapshot::leaf("Summer"));
        assert_eq!(alice, OwnerSnapshot::leaf("alice"));
        assert_ne!(alice, OwnerSnapshot::leaf("bob"));

        let mut mojito = ItemSnapshot::leaf("Mojito");
        mojito.collections.push(CollectionSnapshot::leaf("Summer"));
        assert_eq!(mojito, ItemSnapshot::leaf("Mojito"));
    }

    #[test]
    fn projections_drop_reverse_edges() {
        let summer = (1, "Summer");
        let shared = (2, "Shared");
        let mojito = (10, "Mojito");
        let memberships = vec![
            membership(summer, mojito),
            membership(shared, mojito),
            membership(summer, (11, "Daiquiri")),
        ];
        let rows = GraphRows::new(&memberships);
        let collections = vec![
            collection(1, "Summer", Some((7, "alice"))),
            collection(2, "Shared", None),
        ];

        let owners = rows.owners(
            &[DbOwner {
                id: 7,
                name: "alice".into(),
                created_at: Utc::now(),
            }],
            &collections,
        );
        assert_eq!(owners.len(), 1);
        let owned = &owners[0].collections;
        assert_eq!(owned.len(), 1);
        assert!(owned[0].owner.is_none());
        assert_eq!(owned[0].item_names().collect::<Vec<_>>(), ["Mojito", "Daiquiri"]);
        assert!(owned[0].items.iter().all(|i| i.collections.is_empty()));

        let views = rows.collections(&collections);
        let owner = views[0].owner.as_ref().unwrap();
        assert_eq!(owner.name, "alice");
        assert!(owner.collections.is_empty());
        assert!(views[1].owner.is_none());

        let items = rows.items(&[
            DbItem {
                id: 10,
                name: "Mojito".into(),
                created_at: Utc::now(),
            },
            DbItem {
                id: 12,
                name: "Orphan".into(),
                created_at: Utc::now(),
            },
        ]);
        assert_eq!(items[0].collection_names().collect::<Vec<_>>(), ["Summer", "Shared"]);
        assert!(items[0]
            .collections
            .iter()
            .all(|c| c.items.is_empty() && c.owner.is_none()));
        assert!(items[1].collections.is_empty());
    }
}
