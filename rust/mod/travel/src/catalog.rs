//! The immutable destination catalog.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use tripmatch_kv::KVStore;

use crate::model::Destination;
use crate::service::TravelError;

/// KV key of the seeded catalog (from `{data_dir}/seed/destinations.yaml`).
pub const CATALOG_KEY: &str = "seed:destinations";

const EMBEDDED: &str = include_str!("../data/destinations.yaml");

/// Destinations in load order, indexed by id.
#[derive(Debug, Clone)]
pub struct Catalog {
    destinations: Vec<Destination>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting blank or duplicate ids.
    pub fn new(destinations: Vec<Destination>) -> Result<Self, TravelError> {
        let mut index = HashMap::with_capacity(destinations.len());
        for (i, d) in destinations.iter().enumerate() {
            if d.id.trim().is_empty() {
                return Err(TravelError::Catalog(format!(
                    "destination #{i} ({:?}) has an empty id",
                    d.name
                )));
            }
            if index.insert(d.id.clone(), i).is_some() {
                return Err(TravelError::Catalog(format!("duplicate destination id {:?}", d.id)));
            }
            let mut seen = HashSet::new();
            if let Some(dup) = d.mbti_types.iter().find(|t| !seen.insert(**t)) {
                return Err(TravelError::Catalog(format!(
                    "destination {:?} lists {dup} more than once",
                    d.id
                )));
            }
        }
        Ok(Self {
            destinations,
            index,
        })
    }

    /// Parse a YAML list of destinations. JSON is valid YAML, so `.json`
    /// seed files go through here too.
    pub fn parse(bytes: &[u8]) -> Result<Self, TravelError> {
        let destinations: Vec<Destination> = serde_yaml::from_slice(bytes)
            .map_err(|e| TravelError::Catalog(format!("invalid catalog: {e}")))?;
        Self::new(destinations)
    }

    /// The catalog compiled into the binary.
    pub fn embedded() -> Result<Self, TravelError> {
        Self::parse(EMBEDDED.as_bytes())
    }

    /// Seeded catalog if the KV file layer has one, else the embedded one.
    pub fn load(kv: &dyn KVStore) -> Result<Self, TravelError> {
        let catalog = match kv.get(CATALOG_KEY)? {
            Some(bytes) => {
                let catalog = Self::parse(&bytes)?;
                info!("loaded {} destinations from {CATALOG_KEY}", catalog.len());
                catalog
            }
            None => {
                debug!("no {CATALOG_KEY} entry, using built-in catalog");
                Self::embedded()?
            }
        };
        Ok(catalog)
    }

    pub fn all(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn get(&self, id: &str) -> Option<&Destination> {
        self.index.get(id).map(|&i| &self.destinations[i])
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// Every distinct tag, in the order it first appears.
    pub fn tags(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.destinations
            .iter()
            .flat_map(|d| d.tags.iter())
            .filter(|t| seen.insert(t.as_str()))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tripmatch_kv::{OverlayKV, RedbStore};

    const SMALL: &str = r#"
- id: d1
  name: One
  location: Here
  description: First
  imageUrl: one.jpg
  tags: [beach, city]
  mbtiTypes: [ENFP, INFP]
- id: d2
  name: Two
  location: There
  description: Second
  imageUrl: two.jpg
  tags: [city, food]
  mbtiTypes: [ISTJ]
"#;

    #[test]
    fn embedded_catalog_is_valid() {
        let catalog = Catalog::embedded().unwrap();
        assert!(catalog.len() >= 6);
        assert!(catalog.get("jeju").is_some());
        assert!(catalog.all().iter().all(|d| !d.mbti_types.is_empty()));
    }

    #[test]
    fn repeated_mbti_type_is_rejected() {
        let yaml = r#"
- id: d1
  name: One
  location: Here
  description: First
  imageUrl: one.jpg
  mbtiTypes: [ENFP, enfp]
"#;
        let err = Catalog::parse(yaml.as_bytes()).unwrap_err();
        assert!(matches!(err, TravelError::Catalog(ref m) if m.contains("ENFP")));
    }

    #[test]
    fn lookup_and_order() {
        let catalog = Catalog::parse(SMALL.as_bytes()).unwrap();
        let ids: Vec<&str> = catalog.all().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d2"]);
        assert_eq!(catalog.get("d2").unwrap().name, "Two");
        assert!(catalog.get("d3").is_none());
    }

    #[test]
    fn tags_in_first_seen_order() {
        let catalog = Catalog::parse(SMALL.as_bytes()).unwrap();
        assert_eq!(catalog.tags(), vec!["beach", "city", "food"]);
    }

    #[test]
    fn rejects_duplicate_and_blank_ids() {
        let dup = format!("{SMALL}{}", SMALL.replace("- id: d2", "- id: d9"));
        let err = Catalog::parse(dup.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("\"d1\""), "{err}");

        let blank = SMALL.replace("id: d1", "id: \" \"");
        assert!(matches!(
            Catalog::parse(blank.as_bytes()),
            Err(TravelError::Catalog(_))
        ));
    }

    #[test]
    fn json_is_accepted() {
        let json = r#"[{"id":"j1","name":"J","location":"L","description":"D","imageUrl":"i","mbtiTypes":["entp"]}]"#;
        let catalog = Catalog::parse(json.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("j1").unwrap().tags.is_empty());
    }

    #[test]
    fn load_prefers_seeded_entry() {
        let dir = tempfile::tempdir().unwrap();
        let kv = OverlayKV::new(RedbStore::open(&dir.path().join("kv.redb")).unwrap());

        let catalog = Catalog::load(&kv).unwrap();
        assert!(catalog.get("jeju").is_some());

        kv.insert_file_entry(CATALOG_KEY.to_string(), SMALL.as_bytes().to_vec());
        let catalog = Catalog::load(&kv).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("jeju").is_none());
    }
}
