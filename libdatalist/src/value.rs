//! Datalist value representation.

use std::collections::BTreeMap;
use std::fmt;

/// A datalist value.
///
/// Strings are byte strings: escapes may produce bytes that are not UTF-8,
/// including NUL.
#[derive(Clone, PartialEq)]
pub enum Value {
    /// `nil`.
    Nil,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Integer(i64),
    /// 64-bit floating-point number.
    Float(f64),
    /// Byte string.
    String(Vec<u8>),
    /// Positional values.
    List(Vec<Value>),
    /// Keyed values; the last write of a key wins.
    Map(BTreeMap<Vec<u8>, Value>),
    /// Ordered key/value entries; keys may repeat.
    PairList(Vec<(Vec<u8>, Value)>),
}

impl Value {
    /// Returns `true` if this value is nil.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Returns the boolean value if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Integer`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the float value if this is a `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the raw bytes if this is a `String`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the string if this is a `String` holding valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Returns a reference to the list if this is a `List`.
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns a reference to the map if this is a `Map`.
    pub fn as_map(&self) -> Option<&BTreeMap<Vec<u8>, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the entries if this is a `PairList`.
    pub fn as_pairs(&self) -> Option<&[(Vec<u8>, Value)]> {
        match self {
            Value::PairList(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Look up a key in a map, or the first entry with that key in a pair list.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key.as_bytes()),
            Value::PairList(pairs) => pairs
                .iter()
                .find(|(k, _)| k.as_slice() == key.as_bytes())
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Zero-based element of a list.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_list().and_then(|items| items.get(index))
    }

    /// Type name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::PairList(_) => "pair list",
        }
    }
}

/// Quoted, ASCII-escaped rendering of a byte string.
struct ByteStr<'a>(&'a [u8]);

impl fmt::Debug for ByteStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0.escape_ascii())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{:?}", n),
            Value::String(s) => fmt::Debug::fmt(&ByteStr(s), f),
            Value::List(items) => f.debug_list().entries(items).finish(),
            Value::Map(map) => f
                .debug_map()
                .entries(map.iter().map(|(k, v)| (ByteStr(k), v)))
                .finish(),
            Value::PairList(pairs) => f
                .debug_list()
                .entries(pairs.iter().map(|(k, v)| (ByteStr(k), v)))
                .finish(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into_bytes())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::String(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<BTreeMap<Vec<u8>, Value>> for Value {
    fn from(map: BTreeMap<Vec<u8>, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<Vec<(Vec<u8>, Value)>> for Value {
    fn from(pairs: Vec<(Vec<u8>, Value)>) -> Self {
        Value::PairList(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_rendering() {
        let value = Value::List(vec![
            Value::Nil,
            true.into(),
            42.into(),
            1.0.into(),
            "a\"b\n".into(),
            Value::PairList(vec![(b"k".to_vec(), 1.into())]),
            Value::Map(BTreeMap::from([(b"z".to_vec(), 2.into())])),
        ]);
        assert_eq!(
            format!("{:?}", value),
            r#"[nil, true, 42, 1.0, "a\"b\n", [("k", 1)], {"z": 2}]"#
        );
    }

    #[test]
    fn accessors() {
        let pairs = Value::PairList(vec![
            (b"a".to_vec(), 1.into()),
            (b"a".to_vec(), 2.into()),
        ]);
        assert_eq!(pairs.get("a"), Some(&Value::Integer(1)));
        assert_eq!(pairs.as_pairs().map(<[_]>::len), Some(2));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::String(vec![0xff]).as_str(), None);
        assert_eq!(Value::List(vec![3.into()]).get_index(0), Some(&Value::Integer(3)));
        assert_eq!(Value::Nil.type_name(), "nil");
        assert_eq!(pairs.type_name(), "pair list");
    }
}
