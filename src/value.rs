// Value model: a projected value classified by a set of kinds

use crate::projection::Key;
use crate::stats::Summary;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Set of classifications a [`Value`] carries.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Kinds(u8);

impl Kinds {
    pub const EMPTY: Kinds = Kinds(0);
    /// Categorical; `key` is set
    pub const DISCRETE: Kinds = Kinds(1 << 0);
    /// Numeric; `val` is set
    pub const CONTINUOUS: Kinds = Kinds(1 << 1);
    /// Statistical interval; `summary` is set. Implies CONTINUOUS
    pub const SUMMARY: Kinds = Kinds(1 << 2);
    /// Relative to a baseline. Implies CONTINUOUS or DISCRETE (with `denom`)
    pub const RATIO: Kinds = Kinds(1 << 3);
    pub const ALL: Kinds = Kinds(0b1111);

    /// Individual kinds in fallback comparison order.
    const PRECEDENCE: [Kinds; 4] = [
        Kinds::DISCRETE,
        Kinds::CONTINUOUS,
        Kinds::SUMMARY,
        Kinds::RATIO,
    ];

    pub fn contains(self, other: Kinds) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Kinds {
    type Output = Kinds;
    fn bitor(self, rhs: Kinds) -> Kinds {
        Kinds(self.0 | rhs.0)
    }
}

impl BitOrAssign for Kinds {
    fn bitor_assign(&mut self, rhs: Kinds) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Kinds {
    type Output = Kinds;
    fn bitand(self, rhs: Kinds) -> Kinds {
        Kinds(self.0 & rhs.0)
    }
}

impl fmt::Debug for Kinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Kinds::DISCRETE, "Discrete"),
            (Kinds::CONTINUOUS, "Continuous"),
            (Kinds::SUMMARY, "Summary"),
            (Kinds::RATIO, "Ratio"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(k, _)| self.contains(*k))
            .map(|(_, n)| *n)
            .collect();
        write!(f, "Kinds({})", set.join("|"))
    }
}

/// A value projected onto one aesthetic of a point.
///
/// A value may be several kinds at once: a benchmark parameter like
/// `/size=64` is both the label "64" and the number 64.
#[derive(Debug, Clone, Default)]
pub struct Value {
    pub kinds: Kinds,
    /// Set if DISCRETE
    pub key: Key,
    /// Set if CONTINUOUS
    pub val: f64,
    /// Set if SUMMARY
    pub summary: Option<Summary>,
    /// Set if RATIO and DISCRETE
    pub denom: Key,
}

impl Value {
    pub fn discrete(key: Key) -> Self {
        Value {
            kinds: Kinds::DISCRETE,
            key,
            ..Default::default()
        }
    }

    pub fn continuous(val: f64) -> Self {
        Value {
            kinds: Kinds::CONTINUOUS,
            val,
            ..Default::default()
        }
    }

    pub fn is(&self, kinds: Kinds) -> bool {
        self.kinds.contains(kinds)
    }

    /// Order over values.
    ///
    /// Discrete values order by key (then denominator, for ratios), numeric
    /// values numerically. Values sharing neither kind fall back to a fixed
    /// kind order.
    ///
    /// The order is total within the values one aesthetic can hold: either
    /// discrete values (some also numeric, from a numeric leaf field) or
    /// purely numeric ones. Mixing discrete+numeric values with both
    /// numeric-only and discrete-only values can form a cycle.
    ///
    /// # Panics
    ///
    /// Panics if both values carry the same non-empty kinds without being
    /// discrete or continuous. No well-formed point produces such a value.
    pub fn compare(&self, other: &Value) -> Ordering {
        let shared = self.kinds & other.kinds;
        if shared.contains(Kinds::DISCRETE) {
            let ord = self.key.cmp(&other.key);
            if ord != Ordering::Equal {
                return ord;
            }
            if shared.contains(Kinds::RATIO) {
                return self.denom.cmp(&other.denom);
            }
            return Ordering::Equal;
        }
        if shared.contains(Kinds::CONTINUOUS) {
            return self.val.total_cmp(&other.val);
        }

        for kind in Kinds::PRECEDENCE {
            match (self.kinds.contains(kind), other.kinds.contains(kind)) {
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                _ => {}
            }
        }
        if self.kinds.is_empty() {
            return Ordering::Equal;
        }
        panic!(
            "incomparable kinds {:?}, {:?}",
            self.kinds, other.kinds
        );
    }

    /// Render only the key values, without field names. Used for legend
    /// entries and facet titles.
    pub fn values_string(&self) -> String {
        if self.is(Kinds::DISCRETE) {
            if self.is(Kinds::RATIO) {
                return format!(
                    "{} vs {}",
                    self.key.values_string(),
                    self.denom.values_string()
                );
            }
            return self.key.values_string();
        }
        if self.is(Kinds::CONTINUOUS) {
            return self.val.to_string();
        }
        String::new()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is(Kinds::DISCRETE) {
            if self.is(Kinds::RATIO) {
                return write!(f, "{} vs {}", self.key, self.denom);
            }
            return write!(f, "{}", self.key);
        }
        if self.is(Kinds::CONTINUOUS) {
            return write!(f, "{}", self.val);
        }
        Ok(())
    }
}

// Points are grouped by structural equality, so floats compare by bits.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.kinds == other.kinds
            && self.key == other.key
            && self.val.to_bits() == other.val.to_bits()
            && self.summary == other.summary
            && self.denom == other.denom
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kinds.hash(state);
        self.key.hash(state);
        self.val.to_bits().hash(state);
        self.summary.hash(state);
        self.denom.hash(state);
    }
}
