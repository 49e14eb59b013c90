//! Collections that arrive either as a JSON array or as an object keyed by
//! code/id, depending on the endpoint and API version.
//!
//! Callers always get a `Vec<T>` in wire order; keys are dropped.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Unexpected, Visitor};

/// Values of a keyed mapping, in iteration order.
pub fn map_to_list<K, T>(entries: impl IntoIterator<Item = (K, T)>) -> Vec<T> {
    entries.into_iter().map(|(_, value)| value).collect()
}

/// A collection decoded from either `[v, ...]` or `{"k": v, ...}`.
///
/// Object entries keep document order, which a `HashMap` or `BTreeMap`
/// would lose (`"10"` sorts before `"2"`).
#[derive(Debug, Clone, PartialEq)]
pub enum ListOrMap<T> {
    List(Vec<T>),
    Map(Vec<(String, T)>),
}

impl<T> ListOrMap<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListOrMap::List(items) => items,
            ListOrMap::Map(entries) => map_to_list(entries),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ListOrMap::List(items) => items.len(),
            ListOrMap::Map(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for ListOrMap<T> {
    fn default() -> Self {
        ListOrMap::List(Vec::new())
    }
}

impl<T> From<ListOrMap<T>> for Vec<T> {
    fn from(value: ListOrMap<T>) -> Self {
        value.into_vec()
    }
}

struct ListOrMapVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for ListOrMapVisitor<T> {
    type Value = ListOrMap<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array or an object of records")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(ListOrMap::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(entry) = map.next_entry::<String, T>()? {
            entries.push(entry);
        }
        Ok(ListOrMap::Map(entries))
    }

    // PHP-backed endpoints encode an empty collection as `null` now and then.
    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(ListOrMap::default())
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(ListOrMap::default())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ListOrMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ListOrMapVisitor(PhantomData))
    }
}

/// Field deserializer: `#[serde(deserialize_with = "list_or_map")]` on a
/// `Vec<T>` field.
pub fn list_or_map<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    ListOrMap::deserialize(deserializer).map(ListOrMap::into_vec)
}

/// A string-keyed map that the CRM encodes as `[]` when it is empty.
struct MapOrEmptyList<V>(BTreeMap<String, V>);

struct MapOrEmptyListVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for MapOrEmptyListVisitor<V> {
    type Value = MapOrEmptyList<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object or an empty array")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = BTreeMap::new();
        while let Some((key, value)) = map.next_entry::<String, V>()? {
            entries.insert(key, value);
        }
        Ok(MapOrEmptyList(entries))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        if seq.next_element::<IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_type(Unexpected::Seq, &self));
        }
        Ok(MapOrEmptyList(BTreeMap::new()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(MapOrEmptyList(BTreeMap::new()))
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for MapOrEmptyList<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MapOrEmptyListVisitor(PhantomData))
    }
}

/// Field deserializer for a `BTreeMap<String, V>` that may arrive as `[]`.
pub fn map_or_empty_list<'de, D, V>(deserializer: D) -> Result<BTreeMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    MapOrEmptyList::deserialize(deserializer).map(|map| map.0)
}

/// [`map_or_empty_list`] for `Option<BTreeMap<String, V>>` fields; `null` is `None`.
pub fn optional_map_or_empty_list<'de, D, V>(
    deserializer: D,
) -> Result<Option<BTreeMap<String, V>>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    Option::<MapOrEmptyList<V>>::deserialize(deserializer).map(|map| map.map(|m| m.0))
}
