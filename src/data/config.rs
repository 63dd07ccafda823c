use std::env;

pub const NODE_ID_VAR: &str = "Q_NODE_ID";
pub const MAX_ANCESTOR_DEPTH_VAR: &str = "Q_MAX_ANCESTOR_DEPTH";

pub const DEFAULT_MAX_ANCESTOR_DEPTH: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Node id mixed into generated entity ids.
    pub node_id: u64,
    /// Upper bound on the ancestors returned above the starting record.
    pub max_ancestor_depth: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            node_id: 0,
            max_ancestor_depth: DEFAULT_MAX_ANCESTOR_DEPTH,
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        StoreConfig {
            node_id: read_var(NODE_ID_VAR).unwrap_or(defaults.node_id),
            max_ancestor_depth: read_var(MAX_ANCESTOR_DEPTH_VAR)
                .unwrap_or(defaults.max_ancestor_depth),
        }
    }

    pub fn with_max_ancestor_depth(mut self, depth: usize) -> Self {
        self.max_ancestor_depth = depth;
        self
    }
}

fn read_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring invalid value {:?} for {}", raw, name);
            None
        }
    }
}
