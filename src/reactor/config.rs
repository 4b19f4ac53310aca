use crate::error::ConfigError;
use std::collections::BTreeMap;

/// Which attributes the matcher compares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReactorConfig {
    /// Elements and charges
    pub element: bool,
    pub isotope: bool,
    /// Hybridization and heavy-neighbor counts
    pub extralabels: bool,
    pub stereo: bool,
}
impl Default for ReactorConfig {
    fn default() -> Self {
        Self {
            element: true,
            isotope: false,
            extralabels: false,
            stereo: false,
        }
    }
}

impl ReactorConfig {
    pub const KEYS: [&'static str; 4] = ["element", "extralabels", "isotope", "stereo"];

    /// The configuration as a flat map, for storage.
    pub fn to_map(&self) -> BTreeMap<String, bool> {
        Self::KEYS
            .into_iter()
            .zip([self.element, self.extralabels, self.isotope, self.stereo])
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    /// Restore a stored configuration. The map must have exactly the keys in [`Self::KEYS`].
    pub fn from_map(map: &BTreeMap<String, bool>) -> Result<Self, ConfigError> {
        let matches = map.len() == Self::KEYS.len()
            && Self::KEYS.iter().all(|k| map.contains_key(*k));
        if !matches {
            return Err(ConfigError {
                expected: Self::KEYS.to_vec(),
                found: map.keys().cloned().collect(),
            });
        }
        let get = |k: &str| map.get(k).copied().unwrap_or_default();
        Ok(Self {
            element: get("element"),
            isotope: get("isotope"),
            extralabels: get("extralabels"),
            stereo: get("stereo"),
        })
    }
}
