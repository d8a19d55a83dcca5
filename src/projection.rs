// Projections: how a benchmark record maps onto the values of one aesthetic

use crate::record::Record;
use crate::value::{Kinds, Value};
use std::collections::HashSet;
use std::fmt;

/// Name of the unit field.
pub const UNIT_FIELD: &str = ".unit";

/// A single field of a benchmark record that a projection can select.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    /// `.name`: base benchmark name without sub-name keys
    Name,
    /// `.fullname`: full benchmark name (composite)
    FullName,
    /// `.config`: all file configuration (composite)
    Config,
    /// `.unit`: unit of each reported metric
    Unit,
    /// `/key`: a sub-name key (stored with its leading "/")
    NameKey(String),
    /// `key`: a file configuration key
    ConfigKey(String),
}

impl Field {
    /// Whether the field combines several record fields into one.
    pub fn is_composite(&self) -> bool {
        matches!(self, Field::FullName | Field::Config)
    }

    fn extract(&self, rec: &Record) -> String {
        match self {
            Field::Name => rec.name_parts().base,
            Field::FullName => rec.full_name.clone(),
            Field::Config => rec
                .config
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(" "),
            // Units fan out; see Projection::project_values.
            Field::Unit => String::new(),
            Field::NameKey(k) => rec.name_key(k).unwrap_or_default(),
            Field::ConfigKey(k) => rec.config_value(k).unwrap_or_default().to_string(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => f.write_str(".name"),
            Field::FullName => f.write_str(".fullname"),
            Field::Config => f.write_str(".config"),
            Field::Unit => f.write_str(UNIT_FIELD),
            Field::NameKey(k) | Field::ConfigKey(k) => f.write_str(k),
        }
    }
}

/// One named component of a [`Key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyField {
    pub name: String,
    pub value: String,
}

/// The discrete identity of a record under a projection: a tuple of field
/// values. Keys order lexicographically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    fields: Vec<KeyField>,
}

impl Key {
    pub fn new(fields: Vec<KeyField>) -> Self {
        Key { fields }
    }

    /// A key with a single field.
    pub fn single(name: &str, value: &str) -> Self {
        Key {
            fields: vec![KeyField {
                name: name.to_string(),
                value: value.to_string(),
            }],
        }
    }

    /// Value of the field called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    pub fn fields(&self) -> &[KeyField] {
        &self.fields
    }

    /// Field values separated by spaces, without field names.
    pub fn values_string(&self) -> String {
        self.fields
            .iter()
            .map(|f| f.value.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}:{}", field.name, field.value)?;
        }
        Ok(())
    }
}

/// A parsed projection expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// An explicit list of fields
    Fields(Vec<Field>),
    /// Every name and configuration field not covered by `exclude`
    Residue { exclude: Vec<Field> },
}

impl Projection {
    pub fn fields(fields: Vec<Field>) -> Self {
        Projection::Fields(fields)
    }

    /// The single non-composite field this projection selects, if that is
    /// all it selects.
    pub fn leaf_field(&self) -> Option<&Field> {
        match self {
            Projection::Fields(fields) if fields.len() == 1 && !fields[0].is_composite() => {
                Some(&fields[0])
            }
            _ => None,
        }
    }

    /// Whether this projection includes the unit field.
    pub fn has_unit(&self) -> bool {
        matches!(self, Projection::Fields(fields) if fields.contains(&Field::Unit))
    }

    /// Project `rec` to a single key. The unit field, if any, is empty.
    pub fn project(&self, rec: &Record) -> Key {
        match self {
            Projection::Fields(fields) => Key::new(
                fields
                    .iter()
                    .map(|f| KeyField {
                        name: f.to_string(),
                        value: f.extract(rec),
                    })
                    .collect(),
            ),
            Projection::Residue { exclude } => residue_key(rec, exclude),
        }
    }

    /// Project `rec` to one key per distinct unit it reports.
    pub fn project_values(&self, rec: &Record) -> Vec<Key> {
        let base = self.project(rec);
        rec.units()
            .into_iter()
            .map(|unit| {
                let mut key = base.clone();
                for field in key.fields.iter_mut() {
                    if field.name == UNIT_FIELD {
                        field.value = unit.to_string();
                    }
                }
                key
            })
            .collect()
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Projection::Fields(fields) => {
                let names: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
                f.write_str(&names.join(","))
            }
            Projection::Residue { .. } => f.write_str(".residue"),
        }
    }
}

fn residue_key(rec: &Record, exclude: &[Field]) -> Key {
    let all_name = exclude.contains(&Field::FullName);
    let all_config = exclude.contains(&Field::Config);
    let excluded: HashSet<String> = exclude.iter().map(|f| f.to_string()).collect();

    let mut fields = Vec::new();
    if !all_name {
        let parts = rec.name_parts();
        if !excluded.contains(".name") {
            fields.push(KeyField {
                name: ".name".to_string(),
                value: parts.base,
            });
        }
        for (k, v) in parts.keys {
            if !excluded.contains(&k) {
                fields.push(KeyField { name: k, value: v });
            }
        }
    }
    if !all_config {
        for (k, v) in &rec.config {
            if !excluded.contains(k) {
                fields.push(KeyField {
                    name: k.clone(),
                    value: v.clone(),
                });
            }
        }
    }
    Key::new(fields)
}

/// How one aesthetic is bound to the records.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Binding {
    /// Constant: every record maps to the same empty value
    #[default]
    Unbound,
    /// Independent variable given by a projection expression
    Expr(Projection),
    /// The dependent variable: the metric selected by the unit binding
    Value,
}

impl Binding {
    pub fn is_value(&self) -> bool {
        matches!(self, Binding::Value)
    }

    /// Whether this binding carries the unit field.
    pub fn has_unit(&self) -> bool {
        matches!(self, Binding::Expr(p) if p.has_unit())
    }

    /// Map `rec` to the candidate values for this aesthetic.
    ///
    /// # Panics
    ///
    /// Panics on the dependent-variable binding, which is resolved by
    /// [`crate::plot::Plot::add`] instead.
    pub fn project(&self, rec: &Record) -> Vec<Value> {
        let proj = match self {
            Binding::Unbound => return vec![Value::default()],
            Binding::Value => panic!("cannot project the dependent variable"),
            Binding::Expr(proj) => proj,
        };

        let mut values: Vec<Value> = if proj.has_unit() {
            proj.project_values(rec)
                .into_iter()
                .map(Value::discrete)
                .collect()
        } else {
            vec![Value::discrete(proj.project(rec))]
        };

        // A single plain field may also be numeric.
        if let Some(field) = proj.leaf_field() {
            let name = field.to_string();
            for value in values.iter_mut() {
                let parsed = value.key.get(&name).and_then(|s| s.parse::<f64>().ok());
                if let Some(val) = parsed {
                    value.kinds |= Kinds::CONTINUOUS;
                    value.val = val;
                }
            }
        }

        values
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Unbound => Ok(()),
            Binding::Expr(proj) => write!(f, "{}", proj),
            Binding::Value => f.write_str(".value"),
        }
    }
}
