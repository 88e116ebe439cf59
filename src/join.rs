//! Foreign-key resolution shared by every dashboard.
//!
//! Fetchers collect the distinct foreign ids referenced by their rows, make one
//! batch lookup per foreign table, and label rows through the returned
//! [`NameMap`]. Ids without a row (or a failed lookup) fall back to
//! `"<Entity> ID: <id>"`.

use std::collections::{BTreeSet, HashMap};
use tracing::warn;

pub use crate::store::EntityKind;
use crate::store::ClinicStore;

#[derive(Debug, Clone)]
pub struct NameMap {
    kind: EntityKind,
    names: HashMap<i64, String>,
}

impl NameMap {
    pub fn empty(kind: EntityKind) -> Self {
        Self {
            kind,
            names: HashMap::new(),
        }
    }

    pub fn get(&self, id: i64) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn label(&self, id: i64) -> String {
        match self.get(id) {
            Some(name) => name.to_string(),
            None => fallback_label(self.kind, id),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

pub fn fallback_label(kind: EntityKind, id: i64) -> String {
    format!("{} ID: {}", kind.label(), id)
}

/// Look up display names for the distinct ids in `ids`
pub async fn resolve_names(
    store: &dyn ClinicStore,
    kind: EntityKind,
    ids: impl IntoIterator<Item = i64>,
) -> NameMap {
    let distinct: BTreeSet<i64> = ids.into_iter().collect();
    if distinct.is_empty() {
        return NameMap::empty(kind);
    }

    let ids: Vec<i64> = distinct.into_iter().collect();
    match store.names(kind, &ids).await {
        Ok(rows) => NameMap {
            kind,
            names: rows.into_iter().map(|row| (row.id, row.display())).collect(),
        },
        Err(e) => {
            warn!(entity = kind.label(), error = %e, "Name lookup failed, using id labels");
            NameMap::empty(kind)
        }
    }
}
