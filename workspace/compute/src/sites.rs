//! Site lookup tables: display name <-> identifier, and name search.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, instrument};

use crate::error::{ComputeError, Result};

/// Site identifier exactly as written in the dataset's `id` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteId(String);

impl SiteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SiteId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<i64> for SiteId {
    fn from(id: i64) -> Self {
        Self::new(id.to_string())
    }
}

/// A monitoring site and the number of observations it has.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    pub observations: usize,
}

/// Bijective lookup between site names and identifiers.
#[derive(Debug, Clone, Default)]
pub struct SiteIndex {
    name_to_id: HashMap<String, SiteId>,
    id_to_name: HashMap<SiteId, String>,
    /// Unique names in order of first appearance
    names: Vec<String>,
    observations: HashMap<SiteId, usize>,
}

impl SiteIndex {
    /// Builds the index from `(id, name)` pairs in dataset order.
    ///
    /// Fails with `InconsistentSite` when a name maps to two ids or an id to
    /// two names.
    #[instrument(skip(pairs))]
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut index = SiteIndex::default();

        for (id, name) in pairs {
            let id = SiteId::from(id);

            match index.name_to_id.get(name) {
                Some(known) if *known != id => {
                    return Err(ComputeError::InconsistentSite(format!(
                        "site '{}' has ids '{}' and '{}'",
                        name, known, id
                    )));
                }
                Some(_) => {}
                None => {
                    if let Some(other) = index.id_to_name.get(&id) {
                        return Err(ComputeError::InconsistentSite(format!(
                            "id '{}' is used by '{}' and '{}'",
                            id, other, name
                        )));
                    }
                    index.name_to_id.insert(name.to_string(), id.clone());
                    index.id_to_name.insert(id.clone(), name.to_string());
                    index.names.push(name.to_string());
                }
            }

            *index.observations.entry(id).or_insert(0) += 1;
        }

        debug!("Indexed {} sites", index.names.len());
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name_to_id(&self, name: &str) -> Option<&SiteId> {
        self.name_to_id.get(name)
    }

    pub fn id_to_name(&self, id: &SiteId) -> Option<&str> {
        self.id_to_name.get(id).map(String::as_str)
    }

    /// Resolves a display name, failing with `MissingSite` when unknown.
    pub fn resolve(&self, name: &str) -> Result<&SiteId> {
        self.name_to_id(name)
            .ok_or_else(|| ComputeError::MissingSite(name.to_string()))
    }

    /// Site details for a display name.
    pub fn site(&self, name: &str) -> Result<Site> {
        let id = self.resolve(name)?;
        Ok(Site {
            id: id.clone(),
            name: name.to_string(),
            observations: self.observations.get(id).copied().unwrap_or(0),
        })
    }

    /// All unique names, sorted ascending.
    pub fn sorted_names(&self) -> Vec<String> {
        let mut names = self.names.clone();
        names.sort();
        names
    }

    /// Case-insensitive substring search over site names.
    ///
    /// Blank text lists every site in sorted order; otherwise matches keep the
    /// order in which sites first appear in the dataset.
    pub fn search(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return self.sorted_names();
        }

        let needle = text.to_lowercase();
        self.names
            .iter()
            .filter(|name| name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Every site, sorted by name.
    pub fn sites(&self) -> Vec<Site> {
        self.sorted_names()
            .into_iter()
            .filter_map(|name| self.site(&name).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> SiteIndex {
        SiteIndex::from_pairs(vec![
            ("7", "Lake A"),
            ("3", "river Bistrica"),
            ("7", "Lake A"),
            ("9", "Blue Lake"),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup_is_bijective() {
        let index = index();
        for (id, name) in [("7", "Lake A"), ("3", "river Bistrica"), ("9", "Blue Lake")] {
            let id = SiteId::from(id);
            assert_eq!(index.name_to_id(name), Some(&id));
            assert_eq!(index.id_to_name(&id), Some(name));
        }
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_resolve_unknown_name_is_missing_site() {
        let err = index().resolve("Nowhere").unwrap_err();
        assert!(matches!(err, ComputeError::MissingSite(name) if name == "Nowhere"));
    }

    #[test]
    fn test_search_is_case_insensitive_and_keeps_dataset_order() {
        let index = index();
        assert_eq!(index.search("LAKE"), vec!["Lake A", "Blue Lake"]);
        assert_eq!(index.search("bist"), vec!["river Bistrica"]);
        assert!(index.search("sea").is_empty());
    }

    #[test]
    fn test_blank_search_lists_sorted_names() {
        assert_eq!(
            index().search("   "),
            vec!["Blue Lake", "Lake A", "river Bistrica"]
        );
    }

    #[test]
    fn test_counts_observations() {
        let site = index().site("Lake A").unwrap();
        assert_eq!(site.id, SiteId::from(7));
        assert_eq!(site.observations, 2);
    }

    #[test]
    fn test_rejects_name_with_two_ids() {
        let err = SiteIndex::from_pairs(vec![("1", "Lake A"), ("2", "Lake A")]).unwrap_err();
        assert!(matches!(err, ComputeError::InconsistentSite(_)));
    }

    #[test]
    fn test_rejects_id_with_two_names() {
        let err = SiteIndex::from_pairs(vec![("1", "Lake A"), ("1", "Lake B")]).unwrap_err();
        assert!(matches!(err, ComputeError::InconsistentSite(_)));
    }
}
