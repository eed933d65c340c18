//! Drug and target catalogs.
//!
//! Catalogs are JSONL files of `{id, name, type?, state?}` records loaded
//! once at startup. Only small-molecule, solid-state drugs are eligible for
//! ranking; every target is.

use std::collections::HashMap;
use std::path::Path;

use evx_config::CatalogConfig;
use evx_core::CoreError;
use evx_core::entities::Entity;
use evx_core::enums::EntityType;
use serde::Deserialize;

use crate::error::SearchError;

const DRUG_KIND: &str = "SmallMoleculeDrug";
const DRUG_STATE: &str = "solid";

#[derive(Debug, Deserialize)]
struct CatalogRecord {
    id: String,
    name: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

impl CatalogRecord {
    fn is_rankable_drug(&self) -> bool {
        self.kind.as_deref() == Some(DRUG_KIND) && self.state.as_deref() == Some(DRUG_STATE)
    }
}

/// Entities of one type, keyed by id.
#[derive(Debug, Clone)]
pub struct Catalog {
    entity_type: EntityType,
    by_id: HashMap<String, Entity>,
}

impl Catalog {
    /// Build a catalog from already-loaded entities. Entities of another
    /// type are ignored.
    pub fn from_entities(entity_type: EntityType, entities: impl IntoIterator<Item = Entity>) -> Self {
        let by_id = entities
            .into_iter()
            .filter(|e| e.entity_type == entity_type)
            .map(|e| (e.id.clone(), e))
            .collect();
        Self {
            entity_type,
            by_id,
        }
    }

    /// Load the drug catalog, keeping only small-molecule solid drugs.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Catalog`] if the file cannot be read or a line
    /// is not a catalog record.
    pub fn load_drugs(path: impl AsRef<Path>) -> Result<Self, SearchError> {
        Self::load(path.as_ref(), EntityType::Drug, CatalogRecord::is_rankable_drug)
    }

    /// Load the target catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Catalog`] if the file cannot be read or a line
    /// is not a catalog record.
    pub fn load_targets(path: impl AsRef<Path>) -> Result<Self, SearchError> {
        Self::load(path.as_ref(), EntityType::Target, |_| true)
    }

    fn load(
        path: &Path,
        entity_type: EntityType,
        keep: impl Fn(&CatalogRecord) -> bool,
    ) -> Result<Self, SearchError> {
        let catalog_err = |e: std::io::Error| SearchError::Catalog(format!("{}: {e}", path.display()));

        let mut total = 0usize;
        let mut entities = Vec::new();
        for record in serde_jsonlines::json_lines::<CatalogRecord, _>(path).map_err(catalog_err)? {
            let record = record.map_err(catalog_err)?;
            total += 1;
            if keep(&record) {
                entities.push(Entity {
                    id: record.id,
                    name: record.name,
                    entity_type,
                });
            }
        }

        let catalog = Self::from_entities(entity_type, entities);
        tracing::info!(
            path = %path.display(),
            %entity_type,
            total,
            kept = catalog.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    #[must_use]
    pub const fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.by_id.get(id)
    }

    /// Display name for an entity id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownEntity`] if the id is not in the catalog.
    pub fn name_of(&self, id: &str) -> Result<&str, CoreError> {
        self.by_id
            .get(id)
            .map(|e| e.name.as_str())
            .ok_or_else(|| CoreError::UnknownEntity {
                entity_type: self.entity_type,
                id: id.to_string(),
            })
    }
}

/// Both catalogs.
#[derive(Debug, Clone)]
pub struct Catalogs {
    pub drugs: Catalog,
    pub targets: Catalog,
}

impl Catalogs {
    /// Load both catalogs from the configured paths.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Catalog`] if either file cannot be loaded.
    pub fn load(config: &CatalogConfig) -> Result<Self, SearchError> {
        Ok(Self {
            drugs: Catalog::load_drugs(&config.drugs_path)?,
            targets: Catalog::load_targets(&config.targets_path)?,
        })
    }

    #[must_use]
    pub const fn get(&self, entity_type: EntityType) -> &Catalog {
        match entity_type {
            EntityType::Drug => &self.drugs,
            EntityType::Target => &self.targets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DRUGS: &str = r#"{"id": "DB12466", "name": "Favipiravir", "type": "SmallMoleculeDrug", "state": "solid"}
{"id": "DB00602", "name": "Ivermectin", "type": "SmallMoleculeDrug", "state": "solid"}
{"id": "DB00001", "name": "Lepirudin", "type": "BiotechDrug", "state": "liquid"}
{"id": "DB00002", "name": "Nitrous oxide", "type": "SmallMoleculeDrug", "state": "gas"}
{"id": "DB00003", "name": "Untyped"}
"#;

    const TARGETS: &str = r#"{"id": "P0DTD1", "name": "Replicase polyprotein 1ab"}
{"id": "P0DTC2", "name": "Spike glycoprotein"}
"#;

    fn write(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn drug_catalog_keeps_small_molecule_solids() {
        let dir = tempfile::tempdir().unwrap();
        let drugs = Catalog::load_drugs(write(dir.path(), "drugs.jsonl", DRUGS)).unwrap();
        assert_eq!(drugs.len(), 2);
        assert_eq!(drugs.name_of("DB12466").unwrap(), "Favipiravir");
        assert!(drugs.get("DB00001").is_none());
    }

    #[test]
    fn target_catalog_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        let targets = Catalog::load_targets(write(dir.path(), "targets.jsonl", TARGETS)).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets.entity_type(), EntityType::Target);
    }

    #[test]
    fn unknown_id_is_reported_with_type() {
        let catalog = Catalog::from_entities(EntityType::Drug, Vec::new());
        let err = catalog.name_of("DB99999").unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnknownEntity {
                entity_type: EntityType::Drug,
                ..
            }
        ));
    }

    #[test]
    fn from_entities_ignores_other_types() {
        let catalog = Catalog::from_entities(
            EntityType::Drug,
            vec![
                Entity {
                    id: "DB1".into(),
                    name: "A".into(),
                    entity_type: EntityType::Drug,
                },
                Entity {
                    id: "P1".into(),
                    name: "B".into(),
                    entity_type: EntityType::Target,
                },
            ],
        );
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn missing_or_malformed_files_are_catalog_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Catalog::load_targets(dir.path().join("absent.jsonl")),
            Err(SearchError::Catalog(_))
        ));
        let bad = write(dir.path(), "bad.jsonl", "{\"id\": 1}\n");
        assert!(matches!(
            Catalog::load_targets(bad),
            Err(SearchError::Catalog(_))
        ));
    }

    #[test]
    fn catalogs_load_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogConfig {
            drugs_path: write(dir.path(), "d.jsonl", DRUGS).display().to_string(),
            targets_path: write(dir.path(), "t.jsonl", TARGETS).display().to_string(),
        };
        let catalogs = Catalogs::load(&config).unwrap();
        assert_eq!(catalogs.get(EntityType::Drug).len(), 2);
        assert_eq!(catalogs.get(EntityType::Target).len(), 2);
    }
}
