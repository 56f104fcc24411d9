//! Saved and liked destinations.

use tracing::{debug, info};

use crate::model::{CollectedDestination, RelationKind, RelationRow};
use crate::service::{TravelError, TravelService};

impl TravelService {
    /// Store a (user, destination) pair. The destination id is not checked
    /// against the catalog; unknown ids are dropped when listing.
    pub fn add_relation(
        &self,
        kind: RelationKind,
        user_id: &str,
        destination_id: &str,
    ) -> Result<RelationRow, TravelError> {
        validate_pair(user_id, destination_id)?;
        let row = self.relations.insert(kind, user_id, destination_id)?;
        info!(%user_id, %destination_id, "destination {}", kind.as_str());
        Ok(row)
    }

    /// Remove a pair. Removing an absent pair is not an error.
    pub fn remove_relation(
        &self,
        kind: RelationKind,
        user_id: &str,
        destination_id: &str,
    ) -> Result<(), TravelError> {
        let removed = self.relations.delete(kind, user_id, destination_id)?;
        if removed {
            info!(%user_id, %destination_id, "destination un{}", kind.as_str());
        }
        Ok(())
    }

    /// A user's destinations of `kind`, newest first, joined with the
    /// catalog. Rows pointing at ids not in the catalog are skipped.
    pub fn list_relation(
        &self,
        kind: RelationKind,
        user_id: &str,
    ) -> Result<Vec<CollectedDestination>, TravelError> {
        let rows = self.relations.list(kind, user_id)?;
        let collected = rows
            .into_iter()
            .filter_map(|row| match self.catalog.get(&row.destination_id) {
                Some(d) => Some(CollectedDestination {
                    destination: d.clone(),
                    collected_at: row.created_at,
                }),
                None => {
                    debug!(
                        %user_id,
                        destination_id = %row.destination_id,
                        "skipping {} row for destination not in catalog",
                        kind.as_str()
                    );
                    None
                }
            })
            .collect();
        Ok(collected)
    }

    pub fn has_relation(
        &self,
        kind: RelationKind,
        user_id: &str,
        destination_id: &str,
    ) -> Result<bool, TravelError> {
        self.relations.contains(kind, user_id, destination_id)
    }

    pub fn save(&self, user_id: &str, destination_id: &str) -> Result<RelationRow, TravelError> {
        self.add_relation(RelationKind::Saved, user_id, destination_id)
    }

    pub fn unsave(&self, user_id: &str, destination_id: &str) -> Result<(), TravelError> {
        self.remove_relation(RelationKind::Saved, user_id, destination_id)
    }

    pub fn like(&self, user_id: &str, destination_id: &str) -> Result<RelationRow, TravelError> {
        self.add_relation(RelationKind::Liked, user_id, destination_id)
    }

    pub fn unlike(&self, user_id: &str, destination_id: &str) -> Result<(), TravelError> {
        self.remove_relation(RelationKind::Liked, user_id, destination_id)
    }

    pub fn list_saved(&self, user_id: &str) -> Result<Vec<CollectedDestination>, TravelError> {
        self.list_relation(RelationKind::Saved, user_id)
    }

    pub fn list_liked(&self, user_id: &str) -> Result<Vec<CollectedDestination>, TravelError> {
        self.list_relation(RelationKind::Liked, user_id)
    }

    pub fn is_saved(&self, user_id: &str, destination_id: &str) -> Result<bool, TravelError> {
        self.has_relation(RelationKind::Saved, user_id, destination_id)
    }

    pub fn is_liked(&self, user_id: &str, destination_id: &str) -> Result<bool, TravelError> {
        self.has_relation(RelationKind::Liked, user_id, destination_id)
    }
}

fn validate_pair(user_id: &str, destination_id: &str) -> Result<(), TravelError> {
    if user_id.is_empty() {
        return Err(TravelError::Validation("user id must not be empty".into()));
    }
    if destination_id.trim().is_empty() {
        return Err(TravelError::Validation("destination id must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::Catalog;
    use crate::relations::RelationStore;
    use crate::service::{testing, TravelConfig};

    fn listed(items: &[CollectedDestination]) -> Vec<&str> {
        items.iter().map(|c| c.destination.id.as_str()).collect()
    }

    #[test]
    fn save_then_unsave_roundtrip() {
        let svc = testing::service();
        svc.save("u1", "d1").unwrap();
        assert_eq!(listed(&svc.list_saved("u1").unwrap()), vec!["d1"]);
        assert!(svc.is_saved("u1", "d1").unwrap());

        svc.unsave("u1", "d1").unwrap();
        assert!(svc.list_saved("u1").unwrap().is_empty());
        assert!(!svc.is_saved("u1", "d1").unwrap());

        // Unsaving again is a no-op.
        svc.unsave("u1", "d1").unwrap();
    }

    #[test]
    fn listing_is_newest_first_with_timestamps() {
        let svc = testing::service();
        let first = svc.like("u1", "d3").unwrap();
        svc.like("u1", "d1").unwrap();

        let liked = svc.list_liked("u1").unwrap();
        assert_eq!(listed(&liked), vec!["d1", "d3"]);
        assert_eq!(liked[1].collected_at, first.created_at);
        assert!(svc.list_saved("u1").unwrap().is_empty());
        assert!(svc.list_liked("u2").unwrap().is_empty());
    }

    #[test]
    fn repeated_save_is_conflict_and_list_has_one_entry() {
        let svc = testing::service();
        svc.save("u1", "d1").unwrap();
        let err = svc.save("u1", "d1").unwrap_err();
        assert!(matches!(err, TravelError::Conflict(_)));
        assert_eq!(listed(&svc.list_saved("u1").unwrap()), vec!["d1"]);
    }

    #[test]
    fn orphaned_rows_are_dropped() {
        let svc = testing::service();
        svc.save("u1", "d1").unwrap();
        svc.save("u1", "gone").unwrap();
        svc.like("u1", "gone").unwrap();

        assert_eq!(listed(&svc.list_saved("u1").unwrap()), vec!["d1"]);
        assert!(svc.list_liked("u1").unwrap().is_empty());
        // The row itself is still stored.
        assert!(svc.is_saved("u1", "gone").unwrap());
    }

    #[test]
    fn empty_ids_are_rejected() {
        let svc = testing::service();
        assert!(matches!(svc.save("", "d1"), Err(TravelError::Validation(_))));
        assert!(matches!(svc.like("u1", " "), Err(TravelError::Validation(_))));
    }

    struct BrokenStore;

    impl RelationStore for BrokenStore {
        fn insert(&self, _: RelationKind, _: &str, _: &str) -> Result<RelationRow, TravelError> {
            Err(TravelError::Storage("disk on fire".into()))
        }
        fn delete(&self, _: RelationKind, _: &str, _: &str) -> Result<bool, TravelError> {
            Err(TravelError::Storage("disk on fire".into()))
        }
        fn list(&self, _: RelationKind, _: &str) -> Result<Vec<RelationRow>, TravelError> {
            Err(TravelError::Storage("disk on fire".into()))
        }
        fn contains(&self, _: RelationKind, _: &str, _: &str) -> Result<bool, TravelError> {
            Err(TravelError::Storage("disk on fire".into()))
        }
    }

    #[test]
    fn storage_errors_propagate_from_every_operation() {
        let catalog = Catalog::parse(testing::CATALOG.as_bytes()).unwrap();
        let svc = TravelService::new(catalog, Arc::new(BrokenStore), TravelConfig::default());

        assert!(matches!(svc.save("u1", "d1"), Err(TravelError::Storage(_))));
        assert!(matches!(svc.unlike("u1", "d1"), Err(TravelError::Storage(_))));
        assert!(matches!(svc.list_saved("u1"), Err(TravelError::Storage(_))));
        assert!(matches!(svc.list_liked("u1"), Err(TravelError::Storage(_))));
        assert!(matches!(svc.is_liked("u1", "d1"), Err(TravelError::Storage(_))));
    }
}
