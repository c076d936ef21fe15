//! Container construction.
//!
//! The parser never builds containers itself. It asks a [`ValueSink`] to
//! create them, fill them and seal them into values, so callers can
//! materialise documents in whatever representation they need. [`TreeSink`]
//! builds the owned [`Value`] tree.

use std::collections::BTreeMap;

use crate::coerce::Scalar;
use crate::value::Value;

/// Builder interface the parser drives.
///
/// A container is created only once the parser knows which kind it needs,
/// filled in document order, then sealed with the matching `end_*` call.
/// On a parse error, containers still open are simply dropped.
///
/// # Example
///
/// ```ignore
/// struct Counter(usize);
///
/// impl ValueSink for Counter {
///     type Value = ();
///     type List = ();
///     type Map = ();
///     type PairList = ();
///
///     fn scalar(&mut self, _: Scalar<'_>) { self.0 += 1 }
///     // ...
/// }
/// ```
pub trait ValueSink {
    /// Finished value of any kind.
    type Value;
    /// List under construction.
    type List;
    /// Map under construction.
    type Map;
    /// Pair list under construction.
    type PairList;

    /// Materialise a scalar.
    fn scalar(&mut self, scalar: Scalar<'_>) -> Self::Value;

    fn create_list(&mut self) -> Self::List;
    /// Store `value` at one-based position `index`. Indices arrive in order.
    fn set_index(&mut self, list: &mut Self::List, index: usize, value: Self::Value);
    fn end_list(&mut self, list: Self::List) -> Self::Value;

    fn create_map(&mut self) -> Self::Map;
    /// Store `value` under `key`, replacing any earlier value.
    fn set_key(&mut self, map: &mut Self::Map, key: &[u8], value: Self::Value);
    fn end_map(&mut self, map: Self::Map) -> Self::Value;

    fn create_pair_list(&mut self) -> Self::PairList;
    /// Append a `[key, value]` entry. Keys are never deduplicated.
    fn append_pair(&mut self, pairs: &mut Self::PairList, key: &[u8], value: Self::Value);
    fn end_pair_list(&mut self, pairs: Self::PairList) -> Self::Value;
}

/// Sink producing an owned [`Value`] tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeSink;

impl ValueSink for TreeSink {
    type Value = Value;
    type List = Vec<Value>;
    type Map = BTreeMap<Vec<u8>, Value>;
    type PairList = Vec<(Vec<u8>, Value)>;

    fn scalar(&mut self, scalar: Scalar<'_>) -> Value {
        match scalar {
            Scalar::Nil => Value::Nil,
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Integer(n) => Value::Integer(n),
            Scalar::Float(f) => Value::Float(f),
            Scalar::String(s) => Value::String(s.into_owned()),
        }
    }

    fn create_list(&mut self) -> Vec<Value> {
        Vec::new()
    }

    fn set_index(&mut self, list: &mut Vec<Value>, index: usize, value: Value) {
        debug_assert_eq!(index, list.len() + 1);
        list.push(value);
    }

    fn end_list(&mut self, list: Vec<Value>) -> Value {
        Value::List(list)
    }

    fn create_map(&mut self) -> BTreeMap<Vec<u8>, Value> {
        BTreeMap::new()
    }

    fn set_key(&mut self, map: &mut BTreeMap<Vec<u8>, Value>, key: &[u8], value: Value) {
        map.insert(key.to_vec(), value);
    }

    fn end_map(&mut self, map: BTreeMap<Vec<u8>, Value>) -> Value {
        Value::Map(map)
    }

    fn create_pair_list(&mut self) -> Vec<(Vec<u8>, Value)> {
        Vec::new()
    }

    fn append_pair(&mut self, pairs: &mut Vec<(Vec<u8>, Value)>, key: &[u8], value: Value) {
        pairs.push((key.to_vec(), value));
    }

    fn end_pair_list(&mut self, pairs: Vec<(Vec<u8>, Value)>) -> Value {
        Value::PairList(pairs)
    }
}
