use std::collections::BTreeSet;
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::config::hadoop_config::HadoopConfig;
use crate::error::{HdfsConfError, Result};

const FS_DEFAULT_FS: &str = "fs.defaultFS";
const HDFS_SCHEME: &str = "hdfs://";
const NAMENODE_RPC_ADDRESS: &str = "dfs.namenode.rpc-address";

/// Caller-owned holder of the last-resolved default filesystem name.
///
/// A fresh context holds the empty string until a resolution determines a
/// name. Safe to share across threads; the last writer wins.
pub struct ClusterContext {
    default_fs: RwLock<String>,
}

impl ClusterContext {
    pub fn new() -> Self {
        ClusterContext {
            default_fs: RwLock::new(String::new()),
        }
    }

    /// Returns the namenode addresses for `given_fs`, or for the configured
    /// `fs.defaultFS` cluster when `given_fs` is empty. The returned
    /// addresses are deduplicated and sorted.
    pub fn resolve_namenodes(&self, conf: &HadoopConfig, given_fs: &str) -> Result<Vec<String>> {
        let cluster_name = if given_fs.is_empty() {
            let default_fs = conf.get(FS_DEFAULT_FS).ok_or_else(|| {
                HdfsConfError::UnresolvedDefaultFS(String::from("no defaultFS in configuration"))
            })?;
            let name = default_fs.strip_prefix(HDFS_SCHEME).unwrap_or(default_fs);
            if name.is_empty() {
                return Err(HdfsConfError::UnresolvedDefaultFS(String::from(
                    "no defaultFS in configuration",
                )));
            }
            name.to_string()
        } else {
            // The override is used verbatim, scheme prefix included.
            given_fs.to_string()
        };

        *self
            .default_fs
            .write()
            .unwrap_or_else(PoisonError::into_inner) = cluster_name.clone();

        let prefix = format!("{}.{}.", NAMENODE_RPC_ADDRESS, cluster_name);
        let namenodes: BTreeSet<&str> = conf
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(_, value)| value)
            .collect();

        if namenodes.is_empty() {
            return Err(HdfsConfError::UnresolvedNamenode(String::from(
                "no namenode address in configuration",
            )));
        }

        debug!(
            "resolved {} namenode(s) for cluster {}",
            namenodes.len(),
            cluster_name
        );
        Ok(namenodes.into_iter().map(String::from).collect())
    }

    /// The default filesystem name set by the last resolution that
    /// determined one, empty if none has.
    pub fn default_fs(&self) -> String {
        self.default_fs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for ClusterContext {
    fn default() -> Self {
        Self::new()
    }
}
