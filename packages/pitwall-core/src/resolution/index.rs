//! Reference Index Builder
//!
//! Turns a bag of foreign keys into an O(1) lookup table with exactly one
//! batched fetch. Identifiers are deduplicated before the fetch, so the
//! number of queries does not depend on how many records repeat a key.
//! An empty identifier set issues no query at all.

use std::collections::{BTreeSet, HashMap};
use std::future::Future;

use pitwall_storage::{find_documents, CollectionStore, Document, Filter, Keyed};
use tracing::{debug, warn};

use super::reference::Reference;
use crate::{CoreError, Result};

/// Deduplicated identifier set handed to a batched fetch
///
/// Ordered so the same request always produces the same query.
pub type IdSet = BTreeSet<String>;

/// Identifier → entity lookup built for one request
///
/// Only identifiers that were found are present; absence means unresolved.
#[derive(Debug, Clone)]
pub struct ReferenceIndex<E> {
    entries: HashMap<String, E>,
    requested: usize,
}

impl<E> ReferenceIndex<E> {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            requested: 0,
        }
    }

    pub fn get(&self, id: &str) -> Option<&E> {
        self.entries.get(id)
    }

    pub fn resolve(&self, id: &str) -> Reference<&E> {
        self.get(id).into()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of entities found
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct identifiers asked for that did not resolve
    pub fn missing(&self) -> usize {
        self.requested.saturating_sub(self.entries.len())
    }

    /// Derive a presentation value once per entity instead of once per use
    pub fn map_values<U>(self, f: impl Fn(E) -> U) -> ReferenceIndex<U> {
        ReferenceIndex {
            entries: self
                .entries
                .into_iter()
                .map(|(id, entity)| (id, f(entity)))
                .collect(),
            requested: self.requested,
        }
    }
}

/// Build an index from `ids` with a single call to `fetch`
///
/// `fetch` receives the deduplicated set and must answer "entities whose key
/// is in the set". If it returns two entities for the same key the first one
/// wins. A fetch error is returned as is; no partial index escapes.
pub async fn build_index<E, I, F, Fut, K>(ids: I, fetch: F, key_of: K) -> Result<ReferenceIndex<E>>
where
    I: IntoIterator,
    I::Item: Into<String>,
    F: FnOnce(IdSet) -> Fut,
    Fut: Future<Output = Result<Vec<E>>>,
    K: Fn(&E) -> &str,
{
    let ids: IdSet = ids.into_iter().map(Into::into).collect();
    if ids.is_empty() {
        return Ok(ReferenceIndex::empty());
    }

    let requested = ids.len();
    let fetched = fetch(ids).await?;

    let mut entries = HashMap::with_capacity(fetched.len());
    for entity in fetched {
        let key = key_of(&entity).to_owned();
        if entries.contains_key(&key) {
            warn!(key = %key, "duplicate key in batched fetch, keeping first");
            continue;
        }
        entries.insert(key, entity);
    }

    Ok(ReferenceIndex { entries, requested })
}

/// [`build_index`] against a store, keyed by the entity's own key field
pub async fn fetch_index<E, S, I>(store: &S, ids: I) -> Result<ReferenceIndex<E>>
where
    E: Keyed,
    S: CollectionStore + ?Sized,
    I: IntoIterator,
    I::Item: Into<String>,
{
    let index = build_index(
        ids,
        |ids| async move {
            debug!(
                collection = E::COLLECTION.as_str(),
                ids = ids.len(),
                "batched reference fetch"
            );
            find_documents::<E, S>(store, &Filter::any_of(E::KEY_FIELD, ids))
                .await
                .map_err(CoreError::from)
        },
        E::key,
    )
    .await?;

    if index.missing() > 0 {
        warn!(
            collection = E::COLLECTION.as_str(),
            missing = index.missing(),
            "unresolved references"
        );
    }
    Ok(index)
}

/// Key → ordered list of entities, for reverse lookups
///
/// Within a group entities keep the order the store returned them in.
#[derive(Debug, Clone)]
pub struct GroupedIndex<E> {
    groups: HashMap<String, Vec<E>>,
}

impl<E> GroupedIndex<E> {
    pub fn empty() -> Self {
        Self {
            groups: HashMap::new(),
        }
    }

    /// Group for `key`; empty when nothing matched
    pub fn get(&self, key: &str) -> &[E] {
        self.groups.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of non-empty groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Every grouped entity, in no particular order across groups
    pub fn values(&self) -> impl Iterator<Item = &E> {
        self.groups.values().flatten()
    }
}

/// Build a grouped index from `keys` with a single call to `fetch`
pub async fn build_grouped_index<E, I, F, Fut, K>(
    keys: I,
    fetch: F,
    key_of: K,
) -> Result<GroupedIndex<E>>
where
    I: IntoIterator,
    I::Item: Into<String>,
    F: FnOnce(IdSet) -> Fut,
    Fut: Future<Output = Result<Vec<E>>>,
    K: Fn(&E) -> &str,
{
    let keys: IdSet = keys.into_iter().map(Into::into).collect();
    if keys.is_empty() {
        return Ok(GroupedIndex::empty());
    }

    let mut groups: HashMap<String, Vec<E>> = HashMap::new();
    for entity in fetch(keys).await? {
        groups
            .entry(key_of(&entity).to_owned())
            .or_default()
            .push(entity);
    }
    Ok(GroupedIndex { groups })
}

/// [`build_grouped_index`] against a store, grouping by `field`
pub async fn fetch_grouped<E, S, I, K>(
    store: &S,
    field: &str,
    keys: I,
    key_of: K,
) -> Result<GroupedIndex<E>>
where
    E: Document,
    S: CollectionStore + ?Sized,
    I: IntoIterator,
    I::Item: Into<String>,
    K: Fn(&E) -> &str,
{
    build_grouped_index(
        keys,
        |keys| async move {
            debug!(
                collection = E::COLLECTION.as_str(),
                field,
                keys = keys.len(),
                "batched grouped fetch"
            );
            find_documents::<E, S>(store, &Filter::any_of(field, keys))
                .await
                .map_err(CoreError::from)
        },
        key_of,
    )
    .await
}
