//! Two-layer fill context for pattern expansion
//!
//! The base layer holds the workflow config as loaded; the overlay
//! holds every sample table column as a per-run list. Lookups hit the
//! overlay first, so a sample table column shadows a config key of the
//! same name. Neither layer is ever mutated in place.

use config::Table;
use hashbrown::HashMap;
use serde_yaml::{Mapping, Value};

use crate::utils::render_scalar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Config,
    SampleTable,
}

/// a resolved fill entry, borrowed from its layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillValue<'a> {
    Config(&'a Value),
    Column(&'a [String]),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillContext {
    base: HashMap<String, Value>,
    overlay: HashMap<String, Vec<String>>,
}

impl FillContext {
    /// config as base layer, sample table columns as overlay
    pub fn new(config: &Mapping, sampletable: &Table) -> Self {
        let base = config
            .iter()
            .filter_map(|(k, v)| match render_scalar(k) {
                Some(key) => Some((key, v.clone())),
                None => {
                    log::warn!("WARN: skipping non-scalar config key {:?}", k);
                    None
                }
            })
            .collect::<Vec<_>>();

        Self::from_layers(base, sampletable.to_lists())
    }

    pub fn from_layers<B, O>(base: B, overlay: O) -> Self
    where
        B: IntoIterator<Item = (String, Value)>,
        O: IntoIterator<Item = (String, Vec<String>)>,
    {
        Self {
            base: base.into_iter().collect(),
            overlay: overlay.into_iter().collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<FillValue<'_>> {
        if let Some(column) = self.overlay.get(key) {
            return Some(FillValue::Column(column));
        }

        self.base.get(key).map(FillValue::Config)
    }

    /// which layer a key resolves from
    pub fn layer(&self, key: &str) -> Option<Layer> {
        match self.get(key)? {
            FillValue::Config(_) => Some(Layer::Config),
            FillValue::Column(_) => Some(Layer::SampleTable),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.overlay.contains_key(key) || self.base.contains_key(key)
    }

    /// config keys hidden by a sample table column of the same name
    pub fn shadowed(&self) -> Vec<&str> {
        let mut keys = self
            .base
            .keys()
            .filter(|k| self.overlay.contains_key(k.as_str()))
            .map(String::as_str)
            .collect::<Vec<_>>();
        keys.sort_unstable();
        keys
    }

    /// every resolvable key, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = self
            .base
            .keys()
            .chain(self.overlay.keys())
            .map(String::as_str)
            .collect::<Vec<_>>();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.overlay.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> FillContext {
        FillContext::from_layers(
            vec![
                ("sample".to_string(), Value::String("from-config".into())),
                ("genome".to_string(), Value::String("dm6".into())),
            ],
            vec![
                ("run".to_string(), vec!["r1".to_string(), "r2".to_string()]),
                ("sample".to_string(), vec!["s1".to_string(), "s2".to_string()]),
            ],
        )
    }

    #[test]
    fn test_overlay_wins_on_collision() {
        let fill = context();

        assert_eq!(
            fill.get("sample"),
            Some(FillValue::Column(&["s1".to_string(), "s2".to_string()]))
        );
        assert_eq!(fill.layer("sample"), Some(Layer::SampleTable));
        assert_eq!(fill.layer("genome"), Some(Layer::Config));
        assert_eq!(fill.layer("missing"), None);
    }

    #[test]
    fn test_shadowed_and_keys() {
        let fill = context();

        assert_eq!(fill.shadowed(), vec!["sample"]);
        assert_eq!(fill.keys(), vec!["genome", "run", "sample"]);
        assert_eq!(fill.len(), 3);
        assert!(fill.contains_key("run"));
    }

    #[test]
    fn test_base_layer_is_untouched() {
        let fill = context();
        assert_eq!(
            fill.base.get("sample"),
            Some(&Value::String("from-config".into()))
        );
    }

    #[test]
    fn test_empty_context() {
        assert!(FillContext::default().is_empty());
        assert_eq!(FillContext::default().get("run"), None);
    }
}
