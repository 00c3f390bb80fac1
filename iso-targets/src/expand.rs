//! Pattern expansion
//! Alejandro Gonzales-Irribarren, 2025
//!
//! Turns a nested YAML structure of filename templates into a
//! `TargetMap` of the same shape. Templates use `{name}` placeholders,
//! `{{`/`}}` for literal braces, and may carry a wildcard constraint
//! (`{name,regex}`) that is ignored here. Scalar fill values are
//! broadcast; list values (sample table columns, config sequences) are
//! zipped position-wise, so every list referenced by a template must
//! have the same length.

use config::IsoError;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_yaml::Value;

use crate::fill::{FillContext, FillValue};
use crate::utils::{kind, render_scalar};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(String),
}

/// a parsed filename template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    raw: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Resolved {
    Broadcast(String),
    PerRun(Vec<String>),
}

impl Resolved {
    fn at(&self, i: usize) -> &str {
        match self {
            Resolved::Broadcast(value) => value,
            Resolved::PerRun(values) => &values[i],
        }
    }
}

impl Template {
    pub fn parse(raw: &str) -> Result<Self, IsoError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = raw.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    let unbalanced = || {
                        IsoError::Expansion(format!("unbalanced '{{' in template '{}'", raw))
                    };

                    // braces are only allowed inside the constraint, e.g. {run,r[0-9]{2}}
                    let mut name = String::new();
                    let mut constrained = false;
                    let mut depth = 0usize;
                    loop {
                        match chars.next() {
                            Some('}') if depth == 0 => break,
                            Some('}') => {
                                depth -= 1;
                                name.push('}');
                            }
                            Some('{') if constrained => {
                                depth += 1;
                                name.push('{');
                            }
                            Some('{') | None => return Err(unbalanced()),
                            Some(ch) => {
                                constrained |= ch == ',';
                                name.push(ch);
                            }
                        }
                    }

                    let name = match name.split_once(',') {
                        Some((field, _constraint)) => field.trim().to_string(),
                        None => name.trim().to_string(),
                    };
                    if name.is_empty() {
                        return Err(IsoError::Expansion(format!(
                            "empty placeholder in template '{}'",
                            raw
                        )));
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(name));
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => {
                    return Err(IsoError::Expansion(format!(
                        "single '}}' in template '{}'",
                        raw
                    )))
                }
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// distinct placeholder names, in first-occurrence order
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Field(name) = segment {
                if !fields.contains(&name.as_str()) {
                    fields.push(name);
                }
            }
        }
        fields
    }

    /// one path without per-run fields, otherwise one path per run
    pub fn expand(&self, fill: &FillContext) -> Result<Vec<String>, IsoError> {
        let mut resolved = Vec::new();
        for field in self.fields() {
            let value = fill.get(field).ok_or_else(|| {
                IsoError::Expansion(format!(
                    "unresolved placeholder '{{{}}}' in template '{}'",
                    field, self.raw
                ))
            })?;
            resolved.push((field, self.resolve(field, value)?));
        }

        let lengths = resolved
            .iter()
            .filter_map(|(field, value)| match value {
                Resolved::PerRun(values) => Some((*field, values.len())),
                Resolved::Broadcast(_) => None,
            })
            .collect::<Vec<_>>();

        let n = match lengths.first() {
            None => 1,
            Some((_, len)) if lengths.iter().all(|(_, l)| l == len) => *len,
            Some(_) => {
                let detail = lengths
                    .iter()
                    .map(|(field, len)| format!("{}={}", field, len))
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(IsoError::Expansion(format!(
                    "per-run fields of differing lengths ({}) in template '{}'",
                    detail, self.raw
                )));
            }
        };

        let paths = (0..n)
            .map(|i| {
                self.segments
                    .iter()
                    .map(|segment| match segment {
                        Segment::Literal(text) => text.as_str(),
                        Segment::Field(name) => resolved
                            .iter()
                            .find(|(field, _)| field == name)
                            .map(|(_, value)| value.at(i))
                            .unwrap_or_default(),
                    })
                    .collect::<String>()
            })
            .collect();

        Ok(paths)
    }

    fn resolve(&self, field: &str, value: FillValue<'_>) -> Result<Resolved, IsoError> {
        let unusable = |what: &str| {
            IsoError::Expansion(format!(
                "placeholder '{{{}}}' in template '{}' resolves to a {}",
                field, self.raw, what
            ))
        };

        match value {
            FillValue::Column(values) => Ok(Resolved::PerRun(values.to_vec())),
            FillValue::Config(Value::Sequence(items)) => items
                .iter()
                .map(|item| render_scalar(item).ok_or_else(|| unusable(kind(item))))
                .collect::<Result<Vec<_>, _>>()
                .map(Resolved::PerRun),
            FillValue::Config(other) => render_scalar(other)
                .map(Resolved::Broadcast)
                .ok_or_else(|| unusable(kind(other))),
        }
    }
}

/// expanded patterns, same shape as the template document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetMap {
    Paths(Vec<String>),
    Nested(Vec<(String, TargetMap)>),
}

impl TargetMap {
    pub fn get(&self, key: &str) -> Option<&TargetMap> {
        match self {
            TargetMap::Nested(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            TargetMap::Paths(_) => None,
        }
    }

    /// follow a sequence of keys through nested levels
    pub fn at(&self, keys: &[&str]) -> Option<&TargetMap> {
        keys.iter().try_fold(self, |node, key| node.get(key))
    }

    pub fn paths(&self) -> Option<&[String]> {
        match self {
            TargetMap::Paths(paths) => Some(paths.as_slice()),
            TargetMap::Nested(_) => None,
        }
    }

    pub fn keys(&self) -> Vec<&str> {
        match self {
            TargetMap::Nested(entries) => entries.iter().map(|(k, _)| k.as_str()).collect(),
            TargetMap::Paths(_) => Vec::new(),
        }
    }

    /// every concrete path in document order, repeats removed
    pub fn flatten(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        dedup_in_order(out)
    }

    fn collect_into(&self, out: &mut Vec<String>) {
        match self {
            TargetMap::Paths(paths) => out.extend(paths.iter().cloned()),
            TargetMap::Nested(entries) => {
                for (_, node) in entries {
                    node.collect_into(out);
                }
            }
        }
    }
}

impl Serialize for TargetMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TargetMap::Paths(paths) => paths.serialize(serializer),
            TargetMap::Nested(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, node) in entries {
                    map.serialize_entry(key, node)?;
                }
                map.end()
            }
        }
    }
}

/// expand a whole pattern document against a fill context
pub fn fill_patterns(patterns: &Value, fill: &FillContext) -> Result<TargetMap, IsoError> {
    expand_node(patterns, fill, "<root>")
}

fn expand_node(node: &Value, fill: &FillContext, at: &str) -> Result<TargetMap, IsoError> {
    match node {
        Value::Mapping(mapping) => {
            let mut entries = Vec::with_capacity(mapping.len());
            for (key, value) in mapping {
                let key = render_scalar(key).ok_or_else(|| {
                    IsoError::Expansion(format!("non-scalar pattern key under '{}'", at))
                })?;
                let child = if at == "<root>" {
                    key.clone()
                } else {
                    format!("{}.{}", at, key)
                };
                entries.push((key, expand_node(value, fill, &child)?));
            }
            Ok(TargetMap::Nested(entries))
        }
        Value::Sequence(items) => {
            let mut paths = Vec::new();
            for item in items {
                paths.extend(expand_leaf(item, fill, at)?);
            }
            Ok(TargetMap::Paths(dedup_in_order(paths)))
        }
        Value::Tagged(tagged) => expand_node(&tagged.value, fill, at),
        leaf => Ok(TargetMap::Paths(dedup_in_order(expand_leaf(
            leaf, fill, at,
        )?))),
    }
}

fn expand_leaf(leaf: &Value, fill: &FillContext, at: &str) -> Result<Vec<String>, IsoError> {
    let raw = render_scalar(leaf).ok_or_else(|| {
        IsoError::Expansion(format!(
            "pattern '{}' is a {}, expected a template string",
            at,
            kind(leaf)
        ))
    })?;

    Template::parse(&raw)?.expand(fill)
}

fn dedup_in_order(paths: Vec<String>) -> Vec<String> {
    let mut seen = hashbrown::HashSet::with_capacity(paths.len());
    paths
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill() -> FillContext {
        FillContext::from_layers(
            vec![
                ("genome".to_string(), Value::String("dm6".into())),
                ("threads".to_string(), Value::Number(8.into())),
                ("nested".to_string(), Value::Mapping(Default::default())),
                (
                    "tissues".to_string(),
                    Value::Sequence(vec![
                        Value::String("testis".into()),
                        Value::String("male".into()),
                        Value::String("ovary".into()),
                    ]),
                ),
            ],
            vec![
                ("run".to_string(), vec!["r1".to_string(), "r2".to_string()]),
                ("sample".to_string(), vec!["s1".to_string(), "s1".to_string()]),
            ],
        )
    }

    fn yaml(doc: &str) -> Value {
        serde_yaml::from_str(doc).unwrap()
    }

    #[test]
    fn test_parse_segments() {
        let template = Template::parse("data/{sample}/{run,[^/]+}.fq.gz").unwrap();
        assert_eq!(template.fields(), vec!["sample", "run"]);
        assert_eq!(template.raw(), "data/{sample}/{run,[^/]+}.fq.gz");
    }

    #[test]
    fn test_constraint_with_quantifier() {
        let template = Template::parse("{sample}/{run,r[0-9]{2}}.bam").unwrap();
        assert_eq!(template.fields(), vec!["sample", "run"]);
        assert_eq!(
            template.expand(&fill()).unwrap(),
            vec!["s1/r1.bam", "s1/r2.bam"]
        );

        let nested = Template::parse("{run,(r{1,2}[0-9]{2})}.txt").unwrap();
        assert_eq!(nested.fields(), vec!["run"]);
        assert!(Template::parse("{run,r[0-9]{2}.bam").is_err());
    }

    #[test]
    fn test_escaped_braces() {
        let template = Template::parse("{{literal}}/{genome}").unwrap();
        assert_eq!(template.expand(&fill()).unwrap(), vec!["{literal}/dm6"]);
    }

    #[test]
    fn test_unbalanced_braces() {
        assert!(Template::parse("data/{sample").is_err());
        assert!(Template::parse("data/sample}").is_err());
        assert!(Template::parse("data/{}").is_err());
        assert!(Template::parse("data/{a{b}}").is_err());
    }

    #[test]
    fn test_no_placeholder_yields_single_path() {
        let template = Template::parse("references/genome.fa").unwrap();
        assert_eq!(template.expand(&fill()).unwrap(), vec!["references/genome.fa"]);
    }

    #[test]
    fn test_zero_runs_yield_no_per_run_paths() {
        let empty = FillContext::from_layers(
            vec![("genome".to_string(), Value::String("dm6".into()))],
            vec![
                ("run".to_string(), Vec::new()),
                ("sample".to_string(), Vec::new()),
            ],
        );

        let per_run = Template::parse("{sample}/{run}.bam").unwrap();
        assert_eq!(per_run.expand(&empty).unwrap(), Vec::<String>::new());

        let broadcast = Template::parse("references/{genome}.fa").unwrap();
        assert_eq!(broadcast.expand(&empty).unwrap(), vec!["references/dm6.fa"]);

        let patterns = yaml("bam: \"{sample}/{run}.bam\"\nfa: \"references/{genome}.fa\"\n");
        let targets = fill_patterns(&patterns, &empty).unwrap();
        assert_eq!(targets.get("bam").and_then(TargetMap::paths), Some(&[][..]));
        assert_eq!(targets.flatten(), vec!["references/dm6.fa"]);
    }

    #[test]
    fn test_scalars_broadcast_over_runs() {
        let template = Template::parse("{genome}/{run}.t{threads}.bam").unwrap();
        assert_eq!(
            template.expand(&fill()).unwrap(),
            vec!["dm6/r1.t8.bam", "dm6/r2.t8.bam"]
        );
    }

    #[test]
    fn test_template_keeps_one_path_per_run() {
        let template = Template::parse("{sample}.txt").unwrap();
        assert_eq!(template.expand(&fill()).unwrap(), vec!["s1.txt", "s1.txt"]);
    }

    #[test]
    fn test_length_mismatch() {
        let template = Template::parse("{run}/{tissues}.txt").unwrap();
        let err = template.expand(&fill()).unwrap_err();

        assert!(matches!(err, IsoError::Expansion(_)));
        assert!(err.to_string().contains("run=2"));
        assert!(err.to_string().contains("tissues=3"));
    }

    #[test]
    fn test_config_sequence_is_per_run() {
        let template = Template::parse("{tissues}.bed").unwrap();
        assert_eq!(
            template.expand(&fill()).unwrap(),
            vec!["testis.bed", "male.bed", "ovary.bed"]
        );
    }

    #[test]
    fn test_unresolved_placeholder() {
        let err = Template::parse("{condition}.txt")
            .unwrap()
            .expand(&fill())
            .unwrap_err();
        assert!(err.to_string().contains("{condition}"));
    }

    #[test]
    fn test_mapping_value_is_unusable() {
        let err = Template::parse("{nested}.txt")
            .unwrap()
            .expand(&fill())
            .unwrap_err();
        assert!(err.to_string().contains("mapping"));
    }

    #[test]
    fn test_fill_patterns_keeps_shape() {
        let patterns = yaml(
            r#"
fastq: "data/{sample}/{run}.fastq.gz"
sqanti:
  classification: "{sample}/sqanti/{sample}_classification.txt"
  report: "sqanti/report.html"
multiqc: ["qc/{run}.html", "qc/multiqc.html"]
"#,
        );

        let targets = fill_patterns(&patterns, &fill()).unwrap();

        assert_eq!(targets.keys(), vec!["fastq", "sqanti", "multiqc"]);
        assert_eq!(
            targets.get("fastq").and_then(TargetMap::paths),
            Some(&["data/s1/r1.fastq.gz".to_string(), "data/s1/r2.fastq.gz".to_string()][..])
        );
        assert_eq!(
            targets
                .at(&["sqanti", "classification"])
                .and_then(TargetMap::paths),
            Some(&["s1/sqanti/s1_classification.txt".to_string()][..])
        );
        assert_eq!(
            targets.get("multiqc").and_then(TargetMap::paths).map(<[String]>::len),
            Some(3)
        );
        assert_eq!(
            targets.flatten(),
            vec![
                "data/s1/r1.fastq.gz",
                "data/s1/r2.fastq.gz",
                "s1/sqanti/s1_classification.txt",
                "sqanti/report.html",
                "qc/r1.html",
                "qc/r2.html",
                "qc/multiqc.html",
            ]
        );
    }

    #[test]
    fn test_null_pattern_names_its_location() {
        let patterns = yaml("sqanti:\n  report: ~\n");
        let err = fill_patterns(&patterns, &fill()).unwrap_err();
        assert!(err.to_string().contains("sqanti.report"));
    }

    #[test]
    fn test_serializes_with_same_shape() {
        let patterns = yaml("out: \"{run}.txt\"\nrefs:\n  fa: genome.fa\n");
        let targets = fill_patterns(&patterns, &fill()).unwrap();

        assert_eq!(
            serde_json::to_value(&targets).unwrap(),
            serde_json::json!({"out": ["r1.txt", "r2.txt"], "refs": {"fa": ["genome.fa"]}})
        );
    }
}
