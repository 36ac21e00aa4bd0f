//! Single-column and composite keys
//!
//! Primary keys and both sides of a foreign key name one or more fields.
//! On disk a single-column key is a plain string and a composite key is a
//! list of strings; in memory both shapes are a [`Key`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Field name(s) making up a key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Single(String),
    Composite(Vec<String>),
}

impl Key {
    /// Build a key from a list of names, collapsing one name to `Single`
    ///
    /// Returns `None` for an empty list.
    pub fn from_names(mut names: Vec<String>) -> Option<Self> {
        match names.len() {
            0 => None,
            1 => names.pop().map(Key::Single),
            _ => Some(Key::Composite(names)),
        }
    }

    /// Names in key order
    pub fn names(&self) -> Vec<&str> {
        match self {
            Key::Single(name) => vec![name.as_str()],
            Key::Composite(names) => names.iter().map(String::as_str).collect(),
        }
    }

    /// Number of fields spanned by the key
    pub fn arity(&self) -> usize {
        match self {
            Key::Single(_) => 1,
            Key::Composite(names) => names.len(),
        }
    }

    pub fn is_composite(&self) -> bool {
        self.arity() > 1
    }

    pub fn contains(&self, name: &str) -> bool {
        match self {
            Key::Single(key) => key == name,
            Key::Composite(names) => names.iter().any(|n| n == name),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Single(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Single(name)
    }
}

impl<S: Into<String>> From<Vec<S>> for Key {
    fn from(names: Vec<S>) -> Self {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() == 1 {
            Key::Single(names.remove(0))
        } else {
            Key::Composite(names)
        }
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Key::Single(name) => serializer.serialize_str(name),
            Key::Composite(names) if names.len() == 1 => serializer.serialize_str(&names[0]),
            Key::Composite(names) => names.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawKey {
    Single(String),
    Composite(Vec<String>),
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawKey::deserialize(deserializer)? {
            RawKey::Single(name) => Key::Single(name),
            RawKey::Composite(names) => Key::from(names),
        })
    }
}
