//! Join Resolver
//!
//! Attaches resolved entities to primary records along their reference
//! fields. Joins never reorder, drop or deduplicate: record order, list
//! order and list length always match the input. A key missing from the
//! index becomes [`Reference::Unresolved`].
//!
//! The record-level functions take an `attach` closure that builds the
//! output record from the input record and what was resolved for it, so
//! typed views decide where the resolved value lands.

use std::collections::HashSet;

use super::index::{GroupedIndex, ReferenceIndex};
use super::reference::Reference;

/// One traversed reference, keeping the identifier it was reached through
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLink<E> {
    pub id: String,
    pub target: Reference<E>,
}

/// Resolve a single reference field per record
///
/// `ref_of` returns `None` when the record carries no reference, which
/// resolves like a miss.
pub fn resolve_one_to_one<R, E, O>(
    records: Vec<R>,
    ref_of: impl Fn(&R) -> Option<&str>,
    index: &ReferenceIndex<E>,
    attach: impl Fn(R, Reference<E>) -> O,
) -> Vec<O>
where
    E: Clone,
{
    records
        .into_iter()
        .map(|record| {
            let target = match ref_of(&record) {
                Some(id) => index.resolve(id).cloned(),
                None => Reference::Unresolved,
            };
            attach(record, target)
        })
        .collect()
}

/// Resolve every entry of a list, same length and order as `entries`
pub fn resolve_list<T, E>(
    entries: &[T],
    id_of: impl Fn(&T) -> &str,
    index: &ReferenceIndex<E>,
) -> Vec<Reference<E>>
where
    E: Clone,
{
    entries
        .iter()
        .map(|entry| index.resolve(id_of(entry)).cloned())
        .collect()
}

/// Resolve a list-valued reference field per record
///
/// `attach` receives one reference per list entry, aligned index for index
/// with `entries(&record)`.
pub fn resolve_one_to_many<R, T, E, O>(
    records: Vec<R>,
    entries: impl Fn(&R) -> &[T],
    id_of: impl Fn(&T) -> &str,
    index: &ReferenceIndex<E>,
    attach: impl Fn(R, Vec<Reference<E>>) -> O,
) -> Vec<O>
where
    E: Clone,
{
    records
        .into_iter()
        .map(|record| {
            let targets = resolve_list(entries(&record), &id_of, index);
            attach(record, targets)
        })
        .collect()
}

/// Two-hop join: record → children (via `children`) → entries → entity
///
/// Each record gets the flattened links of all its children, children in
/// group order and entries in list order. Duplicates are kept; see
/// [`distinct_links`].
pub fn resolve_transitive<R, C, T, E, O>(
    records: Vec<R>,
    key_of: impl Fn(&R) -> &str,
    children: &GroupedIndex<C>,
    entries: impl Fn(&C) -> &[T],
    id_of: impl Fn(&T) -> &str,
    index: &ReferenceIndex<E>,
    attach: impl Fn(R, Vec<ResolvedLink<E>>) -> O,
) -> Vec<O>
where
    E: Clone,
{
    records
        .into_iter()
        .map(|record| {
            let links = children
                .get(key_of(&record))
                .iter()
                .flat_map(|child| entries(child).iter())
                .map(|entry| {
                    let id = id_of(entry);
                    ResolvedLink {
                        id: id.to_owned(),
                        target: index.resolve(id).cloned(),
                    }
                })
                .collect();
            attach(record, links)
        })
        .collect()
}

/// Keep the first link per identifier, preserving order
pub fn distinct_links<E>(links: Vec<ResolvedLink<E>>) -> Vec<ResolvedLink<E>> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(link.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolution::index::{build_grouped_index, build_index};
    use crate::CoreError;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        id: String,
        name: String,
    }

    #[derive(Debug, Clone)]
    struct Squad {
        name: String,
        members: Vec<String>,
    }

    async fn people(ids: &[&str]) -> ReferenceIndex<Person> {
        let known: Vec<Person> = ids
            .iter()
            .map(|id| Person {
                id: (*id).to_owned(),
                name: id.to_uppercase(),
            })
            .collect();
        build_index(
            ids.iter().copied(),
            |_| async { Ok::<_, CoreError>(known) },
            |p: &Person| p.id.as_str(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_one_to_one_keeps_order_and_nulls_misses() {
        let index = people(&["a", "b"]).await;
        let records = vec![Some("b"), Some("ghost"), None, Some("a")];

        let out = resolve_one_to_one(records, |r| *r, &index, |r, target| {
            (r, target.map(|p| p.name))
        });

        assert_eq!(
            out,
            vec![
                (Some("b"), Reference::Resolved("B".to_owned())),
                (Some("ghost"), Reference::Unresolved),
                (None, Reference::Unresolved),
                (Some("a"), Reference::Resolved("A".to_owned())),
            ]
        );
    }

    #[tokio::test]
    async fn test_one_to_many_keeps_length_and_duplicates() {
        let index = people(&["a", "b"]).await;
        let squads = vec![Squad {
            name: "s".into(),
            members: vec!["b".into(), "x".into(), "b".into(), "a".into()],
        }];

        let out = resolve_one_to_many(
            squads,
            |s| s.members.as_slice(),
            |m| m.as_str(),
            &index,
            |s, members| (s.name, members),
        );

        let (_, members) = &out[0];
        assert_eq!(members.len(), 4);
        assert_eq!(members[0].resolved().map(|p| p.id.as_str()), Some("b"));
        assert_eq!(members[1], Reference::Unresolved);
        assert_eq!(members[2].resolved().map(|p| p.id.as_str()), Some("b"));
        assert_eq!(members[3].resolved().map(|p| p.id.as_str()), Some("a"));
    }

    #[tokio::test]
    async fn test_transitive_flattens_per_parent() {
        let index = people(&["a", "b", "c"]).await;

        // (league, squad)
        let squads = build_grouped_index(
            ["east", "west"],
            |_| async {
                Ok::<_, CoreError>(vec![
                    ("east".to_owned(), vec!["a".to_owned(), "b".to_owned()]),
                    ("west".to_owned(), vec!["c".to_owned()]),
                    ("east".to_owned(), vec!["b".to_owned(), "z".to_owned()]),
                ])
            },
            |s: &(String, Vec<String>)| s.0.as_str(),
        )
        .await
        .unwrap();

        let leagues = vec!["west", "east", "north"];
        let out = resolve_transitive(
            leagues,
            |l| *l,
            &squads,
            |s| s.1.as_slice(),
            |m| m.as_str(),
            &index,
            |l, links| (l, links),
        );

        let ids = |links: &[ResolvedLink<Person>]| {
            links.iter().map(|l| l.id.clone()).collect::<Vec<_>>()
        };
        assert_eq!(out[0].0, "west");
        assert_eq!(ids(&out[0].1), vec!["c"]);
        assert_eq!(out[1].0, "east");
        assert_eq!(ids(&out[1].1), vec!["a", "b", "b", "z"]);
        assert_eq!(out[1].1[3].target, Reference::Unresolved);
        assert!(out[2].1.is_empty());

        let distinct = distinct_links(out[1].1.clone());
        assert_eq!(ids(&distinct), vec!["a", "b", "z"]);
    }

    proptest! {
        #[test]
        fn prop_one_to_many_preserves_list_length(
            lists in proptest::collection::vec(
                proptest::collection::vec("[a-e]", 0..8),
                0..6,
            )
        ) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let index = rt.block_on(people(&["a", "c"]));

            let squads: Vec<Squad> = lists
                .iter()
                .map(|members| Squad { name: String::new(), members: members.clone() })
                .collect();

            let out = resolve_one_to_many(
                squads,
                |s| s.members.as_slice(),
                |m| m.as_str(),
                &index,
                |s, resolved| (s.members, resolved),
            );

            prop_assert_eq!(out.len(), lists.len());
            for (members, resolved) in &out {
                prop_assert_eq!(members.len(), resolved.len());
                for (id, target) in members.iter().zip(resolved) {
                    prop_assert_eq!(target.is_resolved(), id == "a" || id == "c");
                }
            }
        }
    }
}
