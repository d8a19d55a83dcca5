// Aesthetic registry: the five visual channels a value can be mapped to

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// A visual channel of the plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Aes {
    X,
    Y,
    Color,
    /// Facet row
    Row,
    /// Facet column
    Col,
}

/// Number of aesthetics. Sizes every [`AesMap`].
pub const AES_COUNT: usize = 5;

impl Aes {
    /// All aesthetics, in expansion order.
    pub const ALL: [Aes; AES_COUNT] = [Aes::X, Aes::Y, Aes::Color, Aes::Row, Aes::Col];

    /// Short name of the aesthetic, such as "x".
    pub fn name(self) -> &'static str {
        match self {
            Aes::X => "x",
            Aes::Y => "y",
            Aes::Color => "color",
            Aes::Row => "row",
            Aes::Col => "col",
        }
    }

    /// Inverse of [`Aes::name`].
    pub fn from_name(name: &str) -> Option<Aes> {
        static NAMES: OnceLock<HashMap<&'static str, Aes>> = OnceLock::new();
        NAMES
            .get_or_init(|| Aes::ALL.iter().map(|&aes| (aes.name(), aes)).collect())
            .get(name)
            .copied()
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Aes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dense map from [`Aes`] to `T`, backed by a fixed-size array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AesMap<T> {
    slots: [T; AES_COUNT],
}

impl<T> AesMap<T> {
    pub fn from_fn(mut f: impl FnMut(Aes) -> T) -> Self {
        Self {
            slots: Aes::ALL.map(&mut f),
        }
    }

    pub fn get(&self, aes: Aes) -> &T {
        &self.slots[aes.index()]
    }

    pub fn get_mut(&mut self, aes: Aes) -> &mut T {
        &mut self.slots[aes.index()]
    }

    pub fn set(&mut self, aes: Aes, val: T) {
        self.slots[aes.index()] = val;
    }

    /// Iterate `(aes, value)` pairs in aesthetic order.
    pub fn iter(&self) -> impl Iterator<Item = (Aes, &T)> {
        Aes::ALL.into_iter().zip(self.slots.iter())
    }

    /// Build a map of a different payload type by transforming each element.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> AesMap<U> {
        AesMap::from_fn(|aes| f(self.get(aes)))
    }
}

impl<T: fmt::Display> fmt::Display for AesMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (aes, val)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}:{}", aes.name(), val)?;
        }
        f.write_str("}")
    }
}
