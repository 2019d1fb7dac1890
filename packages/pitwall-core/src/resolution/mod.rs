//! Reference resolution: batched index building and joins

pub mod index;
pub mod join;
pub mod reference;

pub use index::{
    build_grouped_index, build_index, fetch_grouped, fetch_index, GroupedIndex, IdSet,
    ReferenceIndex,
};
pub use join::{
    distinct_links, resolve_list, resolve_one_to_many, resolve_one_to_one, resolve_transitive,
    ResolvedLink,
};
pub use reference::Reference;
