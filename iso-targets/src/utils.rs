use config::{read_to_string, IsoError};
use serde_yaml::{Mapping, Value};

use std::path::Path;

/// parse a YAML document; any read or syntax failure is a config error
pub fn load_yaml<P: AsRef<Path>>(path: P) -> Result<Value, IsoError> {
    let path = path.as_ref();
    let contents = read_to_string(path).map_err(|e| IsoError::config_parse(path, e))?;

    serde_yaml::from_str(&contents).map_err(|e| IsoError::config_parse(path, e))
}

/// parse a YAML document that must be a top-level mapping
pub fn load_mapping<P: AsRef<Path>>(path: P) -> Result<Mapping, IsoError> {
    let path = path.as_ref();

    match load_yaml(path)? {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Err(IsoError::config_parse(path, "empty document")),
        other => Err(IsoError::config_parse(
            path,
            format!("expected a mapping, found {}", kind(&other)),
        )),
    }
}

/// string form of a scalar YAML value
pub fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => render_scalar(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(tagged) => kind(&tagged.value),
    }
}
