use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, OnceLock, PoisonError, RwLock},
};

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::{
    col::ColumnList,
    ident::IdentifierExpr,
    row::{FieldMeta, Record},
};

/// Where a result column lands in a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnData {
    pub column_name: SmolStr,
    pub field_name: SmolStr,
    pub type_name: &'static str,
}

/// Result columns keyed by column name, in field declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: IndexMap<SmolStr, ColumnData>,
}

impl ColumnMap {
    /// Every mapped field of a record, skip flags aside: they only apply to
    /// writes.
    pub fn from_fields(fields: &[FieldMeta]) -> Self {
        let columns = fields
            .iter()
            .filter(|meta| meta.is_mapped())
            .map(|meta| {
                let data = ColumnData {
                    column_name: SmolStr::new(meta.column),
                    field_name: SmolStr::new(meta.field),
                    type_name: meta.type_name,
                };
                (data.column_name.clone(), data)
            })
            .collect();
        Self { columns }
    }

    /// A one-column map, as used by `pluck`.
    pub fn single(column: &str, type_name: &'static str) -> Self {
        let column = SmolStr::new(column);
        let data = ColumnData {
            column_name: column.clone(),
            field_name: column.clone(),
            type_name,
        };
        Self {
            columns: IndexMap::from([(column, data)]),
        }
    }

    pub fn get(&self, column: &str) -> Option<&ColumnData> {
        self.columns.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnData> {
        self.columns.values()
    }

    /// The mapped columns as a projection.
    pub fn to_columns(&self) -> ColumnList {
        self.columns
            .keys()
            .map(|column| IdentifierExpr::from_parts([column.clone()]).into())
            .collect()
    }
}

type Slot = Arc<OnceLock<Arc<ColumnMap>>>;

/// Column maps of record types, built once per type and then shared.
///
/// Concurrent first lookups of one type race on the same `OnceLock`, so
/// exactly one of them builds the map and the others wait for it.
#[derive(Debug, Default)]
pub struct ColumnMapRegistry {
    maps: RwLock<HashMap<TypeId, Slot>>,
}

impl ColumnMapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column_map<R: Record + 'static>(&self) -> Arc<ColumnMap> {
        self.slot(TypeId::of::<R>())
            .get_or_init(|| Arc::new(ColumnMap::from_fields(R::FIELDS)))
            .clone()
    }

    fn slot(&self, id: TypeId) -> Slot {
        let existing = self
            .maps
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned();
        if let Some(slot) = existing {
            return slot;
        }

        self.maps
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id)
            .or_default()
            .clone()
    }

    /// Number of record types seen so far.
    pub fn len(&self) -> usize {
        self.maps.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use crate::{IntoValue, Value, expr::Expression, tests::render};

    use super::*;

    struct User {
        id: i64,
        name: String,
    }

    impl Record for User {
        const TABLE: &'static str = "users";
        const FIELDS: &'static [FieldMeta] = &[
            FieldMeta::new("id", "id", "i64").skip_insert(),
            FieldMeta::new("name", "user_name", "String"),
            FieldMeta::new("cache", "-", "Vec<u8>"),
        ];

        fn values(&self) -> Vec<Value> {
            vec![self.id.into_value(), self.name.as_str().into_value(), Value::Null]
        }
    }

    struct Tag;

    impl Record for Tag {
        const TABLE: &'static str = "tags";
        const FIELDS: &'static [FieldMeta] = &[FieldMeta::new("label", "label", "String")];

        fn values(&self) -> Vec<Value> {
            vec![Value::Null]
        }
    }

    #[test]
    fn test_from_fields() {
        let map = ColumnMap::from_fields(User::FIELDS);
        assert_eq!(2, map.len());
        assert!(!map.contains("-"));
        let data = map.get("user_name").unwrap();
        assert_eq!("name", data.field_name);
        assert_eq!("String", data.type_name);
        let order = map.iter().map(|data| data.column_name.as_str()).collect::<Vec<_>>();
        assert_eq!(vec!["id", "user_name"], order);
        assert_eq!(
            "\"id\", \"user_name\"",
            render(Expression::from(map.to_columns()))
        );
    }

    #[test]
    fn test_single() {
        let map = ColumnMap::single("email", "String");
        assert_eq!(1, map.len());
        assert_eq!("email", map.get("email").unwrap().field_name);
    }

    #[test]
    fn test_registry_caches_per_type() {
        let registry = ColumnMapRegistry::new();
        assert!(registry.is_empty());
        let first = registry.column_map::<User>();
        let again = registry.column_map::<User>();
        assert!(Arc::ptr_eq(&first, &again));
        let tags = registry.column_map::<Tag>();
        assert_eq!(1, tags.len());
        assert_eq!(2, registry.len());
    }

    #[test]
    fn test_registry_concurrent_first_use() {
        let registry = ColumnMapRegistry::new();
        let maps = thread::scope(|scope| {
            let handles = (0..8)
                .map(|_| scope.spawn(|| registry.column_map::<User>()))
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect::<Vec<_>>()
        });
        assert!(maps.iter().all(|map| Arc::ptr_eq(map, &maps[0])));
        assert_eq!(1, registry.len());
    }
}
