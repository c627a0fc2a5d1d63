use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::load_report::{FileOutcome, LoadReport};

pub const CORE_SITE_XML: &str = "core-site.xml";
pub const HDFS_SITE_XML: &str = "hdfs-site.xml";

const HADOOP_CONF_DIR: &str = "HADOOP_CONF_DIR";
const HADOOP_HOME: &str = "HADOOP_HOME";

/// A single `<property>` element from a Hadoop site file.
#[derive(Debug, Deserialize)]
struct Property {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct PropertyList {
    #[serde(rename = "property", default)]
    property: Vec<Property>,
}

/// Merged key/value configuration from a user's Hadoop site files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HadoopConfig {
    properties: HashMap<String, String>,
}

impl HadoopConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the site files from `path`, or from the directory named by
    /// `HADOOP_CONF_DIR`, or from `$HADOOP_HOME/conf`, in that order.
    pub fn load(path: &str) -> Self {
        Self::load_with_report(path).0
    }

    /// Same as [`HadoopConfig::load`] but also returns the per-file
    /// outcomes. `core-site.xml` is read before `hdfs-site.xml`, so
    /// hdfs-site values win on duplicate keys. Missing or unparsable
    /// files contribute no entries; this never fails.
    pub fn load_with_report(path: &str) -> (Self, LoadReport) {
        let dir = resolve_conf_dir(path);
        let mut config = HadoopConfig::new();
        let mut report = LoadReport::default();

        for file in [CORE_SITE_XML, HDFS_SITE_XML] {
            let file_path = dir.join(file);
            let xml_str = match std::fs::read_to_string(&file_path) {
                Ok(xml_str) => xml_str,
                Err(e) => {
                    debug!("skipping {}: {}", file_path.display(), e);
                    report.record(file, FileOutcome::NotFound);
                    continue;
                }
            };

            let list: PropertyList = match serde_xml_rs::from_str(&xml_str) {
                Ok(list) => list,
                Err(e) => {
                    warn!("skipping unparsable {}: {}", file_path.display(), e);
                    report.record(file, FileOutcome::ParseError(e.to_string()));
                    continue;
                }
            };

            report.record(
                file,
                FileOutcome::Loaded {
                    properties: list.property.len(),
                },
            );
            for property in list.property {
                config.properties.insert(property.name, property.value);
            }
        }

        (config, report)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: String, value: String) -> Option<String> {
        self.properties.insert(key, value)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl FromIterator<(String, String)> for HadoopConfig {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        HadoopConfig {
            properties: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for HadoopConfig {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }
}

fn resolve_conf_dir(path: &str) -> PathBuf {
    if !path.is_empty() {
        return PathBuf::from(path);
    }
    let conf_dir = env::var(HADOOP_CONF_DIR).unwrap_or_default();
    if !conf_dir.is_empty() {
        return PathBuf::from(conf_dir);
    }
    let home = env::var(HADOOP_HOME).unwrap_or_default();
    Path::new(&home).join("conf")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::config::hadoop_config::{resolve_conf_dir, HadoopConfig};

    #[test]
    fn resolve_conf_dir_expects_explicit_path() {
        temp_env::with_vars(
            [("HADOOP_CONF_DIR", Some("/etc/hadoop/conf"))],
            || {
                assert_eq!(resolve_conf_dir("/opt/conf"), PathBuf::from("/opt/conf"));
            },
        );
    }

    #[test]
    fn resolve_conf_dir_expects_env_fallback() {
        temp_env::with_vars(
            [
                ("HADOOP_CONF_DIR", Some("/etc/hadoop/conf")),
                ("HADOOP_HOME", Some("/opt/hadoop")),
            ],
            || {
                assert_eq!(resolve_conf_dir(""), PathBuf::from("/etc/hadoop/conf"));
            },
        );
    }

    #[test]
    fn resolve_conf_dir_expects_home_fallback() {
        temp_env::with_vars(
            [
                ("HADOOP_CONF_DIR", None),
                ("HADOOP_HOME", Some("/opt/hadoop")),
            ],
            || {
                assert_eq!(resolve_conf_dir(""), PathBuf::from("/opt/hadoop/conf"));
            },
        );
    }

    #[test]
    fn resolve_conf_dir_expects_relative_conf_when_unset() {
        temp_env::with_vars(
            [("HADOOP_CONF_DIR", None::<&str>), ("HADOOP_HOME", None)],
            || {
                assert_eq!(resolve_conf_dir(""), PathBuf::from("conf"));
            },
        );
    }

    #[test]
    fn insert_expects_overwrite() {
        let mut config = HadoopConfig::new();
        assert!(config.is_empty());

        assert_eq!(
            config.insert("dfs.replication".to_string(), "1".to_string()),
            None
        );
        assert_eq!(
            config.insert("dfs.replication".to_string(), "3".to_string()),
            Some("1".to_string())
        );

        assert_eq!(config.get("dfs.replication"), Some("3"));
        assert_eq!(config.len(), 1);
    }
}
