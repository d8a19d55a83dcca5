// Benchmark records: the input rows of a plot

use std::collections::HashSet;

/// A single metric reported by a benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Value in the tidied unit
    pub value: f64,
    /// Tidied unit, e.g. "sec/op"
    pub unit: String,
    /// Unit as written in the input, e.g. "ns/op"
    pub orig_unit: String,
}

/// One benchmark result together with the file configuration in effect when
/// it was read.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    /// File configuration (`key: value` lines), in order of first appearance
    pub config: Vec<(String, String)>,
    /// Full name without the "Benchmark" prefix, e.g. "Decode/size=10-8"
    pub full_name: String,
    pub iters: u64,
    pub values: Vec<Measurement>,
}

/// A full benchmark name split into its base name and sub-name keys.
#[derive(Debug, Clone, PartialEq)]
pub struct NameParts {
    pub base: String,
    /// `(key, value)` pairs; keys carry their leading "/", e.g. "/size"
    pub keys: Vec<(String, String)>,
}

impl Record {
    /// Value of the file configuration key `key`, if set.
    pub fn config_value(&self, key: &str) -> Option<&str> {
        self.config
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Split the full name into a base name and "/key" parts.
    ///
    /// `Decode/size=10/fast-8` yields base `Decode/fast` with keys
    /// `/size=10` and `/gomaxprocs=8`.
    pub fn name_parts(&self) -> NameParts {
        let (name, procs) = split_procs(&self.full_name);

        let mut parts = name.split('/');
        let mut base = parts.next().unwrap_or_default().to_string();
        let mut keys = Vec::new();
        for part in parts {
            match part.split_once('=') {
                Some((k, v)) => keys.push((format!("/{}", k), v.to_string())),
                None => {
                    base.push('/');
                    base.push_str(part);
                }
            }
        }
        if let Some(procs) = procs {
            keys.push(("/gomaxprocs".to_string(), procs.to_string()));
        }

        NameParts { base, keys }
    }

    /// Value of the sub-name key `key` (including its leading "/").
    pub fn name_key(&self, key: &str) -> Option<String> {
        self.name_parts()
            .keys
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// The metric reported in `unit`, if any.
    pub fn value(&self, unit: &str) -> Option<f64> {
        self.values.iter().find(|m| m.unit == unit).map(|m| m.value)
    }

    /// Distinct units reported by this record, in order.
    pub fn units(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.values
            .iter()
            .map(|m| m.unit.as_str())
            .filter(|u| seen.insert(*u))
            .collect()
    }

    /// Keep only the metrics whose tidied or original unit is in `keep`.
    /// Returns whether any metric is left.
    pub fn retain_units(&mut self, keep: &HashSet<String>) -> bool {
        self.values
            .retain(|m| keep.contains(&m.unit) || keep.contains(&m.orig_unit));
        !self.values.is_empty()
    }
}

/// Split a trailing "-N" GOMAXPROCS suffix off a benchmark name.
fn split_procs(name: &str) -> (&str, Option<&str>) {
    if let Some((head, tail)) = name.rsplit_once('-') {
        if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) && !head.is_empty() {
            return (head, Some(tail));
        }
    }
    (name, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(name: &str) -> Record {
        Record {
            config: vec![
                ("goos".to_string(), "linux".to_string()),
                ("goarch".to_string(), "amd64".to_string()),
            ],
            full_name: name.to_string(),
            iters: 100,
            values: vec![
                Measurement {
                    value: 1.5e-6,
                    unit: "sec/op".to_string(),
                    orig_unit: "ns/op".to_string(),
                },
                Measurement {
                    value: 64.0,
                    unit: "B/op".to_string(),
                    orig_unit: "B/op".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_name_parts() {
        let rec = make_record("Decode/size=10/fast-8");
        let parts = rec.name_parts();
        assert_eq!(parts.base, "Decode/fast");
        assert_eq!(
            parts.keys,
            vec![
                ("/size".to_string(), "10".to_string()),
                ("/gomaxprocs".to_string(), "8".to_string()),
            ]
        );
        assert_eq!(rec.name_key("/size").as_deref(), Some("10"));
        assert_eq!(rec.name_key("/missing"), None);
    }

    #[test]
    fn test_name_without_procs() {
        let parts = make_record("Encode").name_parts();
        assert_eq!(parts.base, "Encode");
        assert!(parts.keys.is_empty());

        // A dash not followed by digits is part of the name.
        let parts = make_record("Encode-fast").name_parts();
        assert_eq!(parts.base, "Encode-fast");
    }

    #[test]
    fn test_value_lookup() {
        let rec = make_record("Decode");
        assert_eq!(rec.value("B/op"), Some(64.0));
        assert_eq!(rec.value("ns/op"), None);
        assert_eq!(rec.units(), vec!["sec/op", "B/op"]);
        assert_eq!(rec.config_value("goarch"), Some("amd64"));
    }

    #[test]
    fn test_retain_units() {
        let mut rec = make_record("Decode");
        let keep: HashSet<String> = ["ns/op".to_string()].into_iter().collect();
        assert!(rec.retain_units(&keep));
        assert_eq!(rec.units(), vec!["sec/op"]);

        let keep: HashSet<String> = ["allocs/op".to_string()].into_iter().collect();
        assert!(!rec.retain_units(&keep));
    }
}
