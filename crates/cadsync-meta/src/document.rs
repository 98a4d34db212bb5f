//! Format-preserving project document
//!
//! The project file is kept as a raw YAML mapping. Typed entries are read
//! out of it per collection and written back by merging into the original
//! entry mappings, so key order and keys cadsync does not know about
//! survive a sync run.

use cadsync_fs::config::ConfigFormat;
use cadsync_fs::{ConfigStore, NormalizedPath};
use serde_yaml::{Mapping, Value};

use crate::schema::{EntityConfig, EntityKind};
use crate::settings::{ProjectSettings, Styles};
use crate::{Error, Result};

/// An entry that deserialized cleanly, with its position in the collection
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedEntry<T> {
    pub index: usize,
    pub config: T,
}

/// An entry that could not be used; it stays in the document untouched
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedEntry {
    pub kind: EntityKind,
    pub index: usize,
    pub name: Option<String>,
    pub reason: String,
}

/// All entries of one collection
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCollection<T> {
    pub entries: Vec<LoadedEntry<T>>,
    pub malformed: Vec<MalformedEntry>,
}

impl<T: EntityConfig> LoadedCollection<T> {
    /// Every name present in the collection, including malformed entries.
    pub fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.config.name().to_string())
            .chain(self.malformed.iter().filter_map(|m| m.name.clone()))
            .collect()
    }
}

/// A change to one collection, addressed by entry position
#[derive(Debug, Clone, PartialEq)]
pub enum EntryChange<T> {
    /// Merge the typed entry into the existing mapping
    Update { index: usize, config: T },
    /// Delete the entry
    Remove { index: usize },
    /// Add a new entry at the end of the collection
    Append { config: T },
}

/// The project file as a YAML document
#[derive(Debug, Clone)]
pub struct ProjectDocument {
    path: NormalizedPath,
    root: Mapping,
    modified: bool,
}

impl ProjectDocument {
    /// Read a project file.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ProjectNotFound {
                path: path.to_native(),
            });
        }
        let value: Value = ConfigStore::new().load(path)?;
        Self::from_value(path, value)
    }

    /// Parse project content as if it were read from `path`.
    pub fn parse(path: &NormalizedPath, content: &str) -> Result<Self> {
        let format = ConfigFormat::detect(path)?;
        let value: Value = ConfigStore::new().parse(path, format, content)?;
        Self::from_value(path, value)
    }

    fn from_value(path: &NormalizedPath, value: Value) -> Result<Self> {
        let root = match value {
            Value::Mapping(mapping) => mapping,
            Value::Null => Mapping::new(),
            _ => {
                return Err(Error::InvalidProject {
                    path: path.to_native(),
                    message: "top level must be a mapping".into(),
                });
            }
        };
        Ok(Self {
            path: path.clone(),
            root,
            modified: false,
        })
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// Whether typed changes were applied since loading or saving.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// The `settings:` section, with defaults for anything missing.
    pub fn settings(&self) -> Result<ProjectSettings> {
        self.section("settings")
    }

    /// The `styles:` section.
    pub fn styles(&self) -> Result<Styles> {
        self.section("styles")
    }

    fn section<S: serde::de::DeserializeOwned + Default>(&self, key: &str) -> Result<S> {
        match self.root.get(key) {
            None | Some(Value::Null) => Ok(S::default()),
            Some(value) => serde_yaml::from_value(value.clone()).map_err(|e| Error::InvalidProject {
                path: self.path.to_native(),
                message: format!("{}: {}", key, e),
            }),
        }
    }

    /// Read one collection. Malformed entries are reported, not fatal.
    pub fn collection<T: EntityConfig>(&self) -> Result<LoadedCollection<T>> {
        let key = T::KIND.collection_key();
        let mut collection = LoadedCollection {
            entries: Vec::new(),
            malformed: Vec::new(),
        };

        let items = match self.root.get(key) {
            None | Some(Value::Null) => return Ok(collection),
            Some(Value::Sequence(items)) => items,
            Some(_) => {
                return Err(Error::InvalidProject {
                    path: self.path.to_native(),
                    message: format!("'{}' must be a list", key),
                });
            }
        };

        let mut seen: Vec<&str> = Vec::new();
        for (index, item) in items.iter().enumerate() {
            let name = item
                .get("name")
                .and_then(Value::as_str)
                .filter(|n| !n.trim().is_empty());

            let problem = match name {
                None => Some("missing or empty 'name'".to_string()),
                Some(n) if seen.contains(&n) => Some(format!("duplicate name '{}'", n)),
                Some(_) => None,
            };
            if let Some(n) = name {
                seen.push(n);
            }

            let result = match problem {
                Some(reason) => Err(reason),
                None => serde_yaml::from_value::<T>(item.clone()).map_err(|e| e.to_string()),
            };
            match result {
                Ok(config) => collection.entries.push(LoadedEntry { index, config }),
                Err(reason) => {
                    tracing::warn!(
                        collection = key,
                        index,
                        name = name.unwrap_or("<unnamed>"),
                        %reason,
                        "skipping malformed entry"
                    );
                    collection.malformed.push(MalformedEntry {
                        kind: T::KIND,
                        index,
                        name: name.map(str::to_string),
                        reason,
                    });
                }
            }
        }
        Ok(collection)
    }

    /// Apply typed changes to one collection.
    ///
    /// Updates are merged first, then removals (by original index), then
    /// appends, so indices from [`Self::collection`] stay valid throughout.
    pub fn apply<T: EntityConfig>(&mut self, changes: Vec<EntryChange<T>>) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }
        let key = Value::from(T::KIND.collection_key());
        if !matches!(self.root.get(&key), Some(Value::Sequence(_))) {
            self.root.insert(key.clone(), Value::Sequence(Vec::new()));
        }
        let Some(Value::Sequence(items)) = self.root.get_mut(&key) else {
            return Ok(());
        };

        let mut removals = Vec::new();
        let mut appends = Vec::new();
        for change in changes {
            match change {
                EntryChange::Update { index, config } => {
                    let typed = to_mapping(&config)?;
                    match items.get_mut(index) {
                        Some(Value::Mapping(raw)) => merge_entry(raw, typed, T::FIELDS),
                        _ => {
                            tracing::warn!(index, name = config.name(), "update target vanished");
                        }
                    }
                }
                EntryChange::Remove { index } => removals.push(index),
                EntryChange::Append { config } => appends.push(Value::Mapping(to_mapping(&config)?)),
            }
        }

        removals.sort_unstable();
        removals.dedup();
        for index in removals.into_iter().rev() {
            if index < items.len() {
                items.remove(index);
            }
        }
        items.extend(appends);
        self.modified = true;
        Ok(())
    }

    /// Render the document in the format implied by its path.
    pub fn render(&self) -> Result<String> {
        Ok(ConfigStore::new().render(&self.path, &Value::Mapping(self.root.clone()))?)
    }

    /// Write the document atomically.
    pub fn save(&mut self) -> Result<()> {
        ConfigStore::new().save(&self.path, &Value::Mapping(self.root.clone()))?;
        self.modified = false;
        tracing::debug!(path = %self.path, "saved project");
        Ok(())
    }
}

fn to_mapping<T: EntityConfig>(config: &T) -> Result<Mapping> {
    match serde_yaml::to_value(config) {
        Ok(Value::Mapping(mapping)) => Ok(mapping),
        Ok(_) => Err(Error::Serialize {
            name: config.name().to_string(),
            message: "entry did not serialize to a mapping".into(),
        }),
        Err(e) => Err(Error::Serialize {
            name: config.name().to_string(),
            message: e.to_string(),
        }),
    }
}

/// Merge a typed entry into its raw mapping.
///
/// Known keys absent from the typed form are removed; changed values are
/// replaced in place; new keys are appended; unknown keys are untouched.
fn merge_entry(raw: &mut Mapping, typed: Mapping, fields: &[&str]) {
    for field in fields {
        let key = Value::from(*field);
        if !typed.contains_key(&key) {
            raw.remove(&key);
        }
    }
    for (key, value) in typed {
        let unchanged = raw.get(&key).is_some_and(|old| same_value(old, &value));
        if !unchanged {
            raw.insert(key, value);
        }
    }
}

/// Structural equality that treats `1` and `1.0` as the same number.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Sequence(xs), Value::Sequence(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same_value(x, y))
        }
        (Value::Mapping(xm), Value::Mapping(ym)) => {
            xm.len() == ym.len()
                && xm
                    .iter()
                    .all(|(k, x)| ym.get(k).is_some_and(|y| same_value(x, y)))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Point2, TextConfig};
    use pretty_assertions::assert_eq;

    fn doc(content: &str) -> ProjectDocument {
        ProjectDocument::parse(&NormalizedPath::new("/p/cadsync.yaml"), content).unwrap()
    }

    #[test]
    fn test_merge_preserves_order_and_unknown_keys() {
        let mut document = doc(
            "texts:\n- name: Satzung\n  note: keep me\n  text: Old\n  position: [1, 2]\n",
        );
        let collection = document.collection::<TextConfig>().unwrap();
        let mut config = collection.entries[0].config.clone();
        config.text = "New".into();

        document
            .apply(vec![EntryChange::Update { index: 0, config }])
            .unwrap();

        let rendered = document.render().unwrap();
        let pos = |needle: &str| rendered.find(needle).unwrap();
        assert!(pos("name: Satzung") < pos("note: keep me"));
        assert!(pos("note: keep me") < pos("text: New"));
        assert!(pos("text: New") < pos("position"));
        assert!(document.is_modified());
    }

    #[test]
    fn test_cleared_option_is_removed() {
        let mut document =
            doc("texts:\n- name: A\n  text: A\n  position: [0, 0]\n  color: 3\n");
        let mut config = document.collection::<TextConfig>().unwrap().entries[0]
            .config
            .clone();
        config.color = None;
        document
            .apply(vec![EntryChange::Update { index: 0, config }])
            .unwrap();
        assert!(!document.render().unwrap().contains("color"));
    }

    #[test]
    fn test_malformed_entries_are_reported() {
        let document = doc(
            "texts:\n- name: A\n  text: A\n  position: [0, 0]\n- text: no name\n  position: [0, 0]\n- name: A\n  text: dup\n  position: [0, 0]\n- name: B\n  position: oops\n",
        );
        let collection = document.collection::<TextConfig>().unwrap();
        assert_eq!(collection.entries.len(), 1);
        assert_eq!(collection.malformed.len(), 3);
        assert_eq!(collection.malformed[2].name.as_deref(), Some("B"));
        assert_eq!(collection.names(), vec!["A".to_string(), "A".into(), "B".into()]);
    }

    #[test]
    fn test_remove_and_append() {
        let mut document = doc(
            "texts:\n- name: A\n  text: A\n  position: [0, 0]\n- name: B\n  text: B\n  position: [0, 0]\n",
        );
        document
            .apply(vec![
                EntryChange::Remove { index: 0 },
                EntryChange::Append {
                    config: TextConfig::new("C", "C", Point2(1.0, 1.0)),
                },
            ])
            .unwrap();
        let names: Vec<String> = document
            .collection::<TextConfig>()
            .unwrap()
            .entries
            .into_iter()
            .map(|e| e.config.name)
            .collect();
        assert_eq!(names, vec!["B", "C"]);
    }

    #[test]
    fn test_append_creates_missing_collection() {
        let mut document = doc("settings:\n  drawing: plan.dxf\n");
        document
            .apply(vec![EntryChange::Append {
                config: TextConfig::new("A", "A", Point2(0.0, 0.0)),
            }])
            .unwrap();
        assert_eq!(document.collection::<TextConfig>().unwrap().entries.len(), 1);
    }

    #[test]
    fn test_collection_must_be_a_list() {
        let document = doc("texts: nope\n");
        assert!(matches!(
            document.collection::<TextConfig>(),
            Err(Error::InvalidProject { .. })
        ));
    }

    #[test]
    fn test_same_value_ignores_number_representation() {
        let a: Value = serde_yaml::from_str("[1, 2]").unwrap();
        let b: Value = serde_yaml::from_str("[1.0, 2.0]").unwrap();
        assert!(same_value(&a, &b));
    }
}
