//! Metadata values
//!
//! The closed set of value kinds a metadata map can hold.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, DeserializeSeed, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Deepest allowed `List`/`Map` nesting; a top-level value is depth 1
pub const MAX_DEPTH: usize = 64;

/// A single metadata value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MetaValue {
    /// UTF-8 text
    Str(String),

    /// Signed 64-bit integer
    Int(i64),

    /// 64-bit float
    Float(f64),

    /// Boolean flag
    Bool(bool),

    /// Opaque bytes
    Bytes(Vec<u8>),

    /// Ordered sequence of values
    List(Vec<MetaValue>),

    /// Nested map (sorted by key)
    Map(BTreeMap<String, MetaValue>),
}

impl MetaValue {
    /// Short name of the value kind
    pub fn kind(&self) -> &'static str {
        match self {
            MetaValue::Str(_) => "str",
            MetaValue::Int(_) => "int",
            MetaValue::Float(_) => "float",
            MetaValue::Bool(_) => "bool",
            MetaValue::Bytes(_) => "bytes",
            MetaValue::List(_) => "list",
            MetaValue::Map(_) => "map",
        }
    }

    /// True if this value nests deeper than [`MAX_DEPTH`]
    ///
    /// Stops descending at the limit, so the check itself stays shallow.
    pub fn exceeds_max_depth(&self) -> bool {
        self.exceeds_depth_from(1)
    }

    fn exceeds_depth_from(&self, depth: usize) -> bool {
        if depth > MAX_DEPTH {
            return true;
        }
        match self {
            MetaValue::List(items) => items.iter().any(|v| v.exceeds_depth_from(depth + 1)),
            MetaValue::Map(map) => map.values().any(|v| v.exceeds_depth_from(depth + 1)),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            MetaValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Float value; integers are widened
    pub fn as_float(&self) -> Option<f64> {
        match self {
            MetaValue::Float(f) => Some(*f),
            MetaValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetaValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            MetaValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[MetaValue]> {
        match self {
            MetaValue::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, MetaValue>> {
        match self {
            MetaValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Str(s) => write!(f, "{}", s),
            MetaValue::Int(i) => write!(f, "{}", i),
            MetaValue::Float(x) => write!(f, "{}", x),
            MetaValue::Bool(b) => write!(f, "{}", b),
            MetaValue::Bytes(b) => {
                for byte in b {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
            MetaValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            MetaValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

// =============================================================================
// Depth-limited deserialization
// =============================================================================

const VARIANTS: &[&str] = &["Str", "Int", "Float", "Bool", "Bytes", "List", "Map"];

#[derive(Deserialize)]
#[serde(variant_identifier)]
enum Kind {
    Str,
    Int,
    Float,
    Bool,
    Bytes,
    List,
    Map,
}

impl<'de> Deserialize<'de> for MetaValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ValueSeed { depth: 1 }.deserialize(deserializer)
    }
}

/// Deserializes one value sitting at `depth`
struct ValueSeed {
    depth: usize,
}

impl<'de> DeserializeSeed<'de> for ValueSeed {
    type Value = MetaValue;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<MetaValue, D::Error> {
        if self.depth > MAX_DEPTH {
            return Err(de::Error::custom(format!(
                "nesting too deep (limit {})",
                MAX_DEPTH
            )));
        }
        deserializer.deserialize_enum("MetaValue", VARIANTS, self)
    }
}

impl<'de> Visitor<'de> for ValueSeed {
    type Value = MetaValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a metadata value")
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<MetaValue, A::Error> {
        let child = self.depth + 1;
        let (kind, variant) = data.variant::<Kind>()?;
        match kind {
            Kind::Str => variant.newtype_variant().map(MetaValue::Str),
            Kind::Int => variant.newtype_variant().map(MetaValue::Int),
            Kind::Float => variant.newtype_variant().map(MetaValue::Float),
            Kind::Bool => variant.newtype_variant().map(MetaValue::Bool),
            Kind::Bytes => variant.newtype_variant().map(MetaValue::Bytes),
            Kind::List => variant
                .newtype_variant_seed(ListSeed { depth: child })
                .map(MetaValue::List),
            Kind::Map => variant
                .newtype_variant_seed(MapSeed { depth: child })
                .map(MetaValue::Map),
        }
    }
}

/// Elements of a `List`, each at `depth`
struct ListSeed {
    depth: usize,
}

impl<'de> DeserializeSeed<'de> for ListSeed {
    type Value = Vec<MetaValue>;

    fn deserialize<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<Vec<MetaValue>, D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for ListSeed {
    type Value = Vec<MetaValue>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of metadata values")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Vec<MetaValue>, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element_seed(ValueSeed { depth: self.depth })? {
            items.push(item);
        }
        Ok(items)
    }
}

/// Values of a nested `Map`, each at `depth`
struct MapSeed {
    depth: usize,
}

impl<'de> DeserializeSeed<'de> for MapSeed {
    type Value = BTreeMap<String, MetaValue>;

    fn deserialize<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<BTreeMap<String, MetaValue>, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for MapSeed {
    type Value = BTreeMap<String, MetaValue>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of metadata values")
    }

    fn visit_map<A: MapAccess<'de>>(
        self,
        mut access: A,
    ) -> Result<BTreeMap<String, MetaValue>, A::Error> {
        let mut map = BTreeMap::new();
        while let Some(key) = access.next_key::<String>()? {
            let value = access.next_value_seed(ValueSeed { depth: self.depth })?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::Str(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::Str(s)
    }
}

impl From<i64> for MetaValue {
    fn from(i: i64) -> Self {
        MetaValue::Int(i)
    }
}

impl From<i32> for MetaValue {
    fn from(i: i32) -> Self {
        MetaValue::Int(i64::from(i))
    }
}

impl From<u32> for MetaValue {
    fn from(i: u32) -> Self {
        MetaValue::Int(i64::from(i))
    }
}

impl From<f64> for MetaValue {
    fn from(f: f64) -> Self {
        MetaValue::Float(f)
    }
}

impl From<bool> for MetaValue {
    fn from(b: bool) -> Self {
        MetaValue::Bool(b)
    }
}

impl From<Vec<u8>> for MetaValue {
    fn from(b: Vec<u8>) -> Self {
        MetaValue::Bytes(b)
    }
}

impl From<&[u8]> for MetaValue {
    fn from(b: &[u8]) -> Self {
        MetaValue::Bytes(b.to_vec())
    }
}

impl From<Vec<MetaValue>> for MetaValue {
    fn from(items: Vec<MetaValue>) -> Self {
        MetaValue::List(items)
    }
}

impl From<BTreeMap<String, MetaValue>> for MetaValue {
    fn from(map: BTreeMap<String, MetaValue>) -> Self {
        MetaValue::Map(map)
    }
}
