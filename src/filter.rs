//! Filter Engine
//!
//! Filtering borrows the store and returns references in store order; it never clones or
//! mutates records. Each entity defines a criteria struct whose predicates are ANDed together.

use std::hash::Hash;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::debug;

use crate::{
    records::{Entity, Record},
    store::Store,
};

/// Active predicates for one entity type.
pub trait Criteria<E> {
    /// True when `entity` satisfies every active predicate.
    fn matches(&self, entity: &E) -> bool;
}

/// Entity with a fixed list of free-text searchable fields.
pub trait Searchable {
    /// Fields the free-text query looks into.
    fn search_fields(&self) -> SmallVec<[&str; 4]>;
}

/// Case-insensitive substring query. An empty query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextQuery {
    needle: String,
}

impl TextQuery {
    /// Build a query from raw user input.
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.to_lowercase(),
        }
    }

    /// True when no text was entered.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Lower-cased query text.
    pub fn as_str(&self) -> &str {
        &self.needle
    }

    /// True when any of `fields` contains the query.
    pub fn matches<S: Searchable + ?Sized>(&self, searchable: &S) -> bool {
        self.is_empty()
            || searchable
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&self.needle))
    }
}

impl From<&str> for TextQuery {
    fn from(query: &str) -> Self {
        Self::new(query)
    }
}

/// Exact-match categorical predicate; `None` stands for "Todos".
pub fn matches_choice<T: PartialEq>(selected: Option<&T>, value: &T) -> bool {
    selected.is_none_or(|selected| selected == value)
}

/// Records of `store` satisfying `criteria`, in store order.
pub fn filter<'a, E, C>(store: &'a Store<E>, criteria: &C) -> Vec<&'a Record<E>>
where
    E: Entity,
    C: Criteria<E>,
{
    let visible: Vec<_> = store
        .iter()
        .filter(|record| criteria.matches(record.data()))
        .collect();

    debug!(
        kind = E::KIND,
        total = store.len(),
        visible = visible.len(),
        "filtered register"
    );

    visible
}

/// Distinct values of a field across the store, in first-seen order.
pub fn distinct<E, T, F>(store: &Store<E>, key: F) -> Vec<T>
where
    E: Entity,
    T: Eq + Hash + Clone,
    F: Fn(&E) -> T,
{
    let mut seen = FxHashSet::default();
    let mut values = Vec::new();

    for record in store.iter() {
        let value = key(record.data());

        if seen.insert(value.clone()) {
            values.push(value);
        }
    }

    values
}
