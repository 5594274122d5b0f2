//! Store de documentos en memoria.
//!
//! Doble de pruebas y backend de corridas locales: un mapa ordenado clave →
//! documento que implementa las dos interfaces del builder. La iteración en
//! orden de clave hace deterministas los resultados de `query`.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::errors::StoreError;

use super::{Selector, SourceStore, TargetStore};

pub struct InMemoryDocStore {
    key_field: String,
    docs: BTreeMap<String, Value>,
}

impl InMemoryDocStore {
    pub fn new(key_field: impl Into<String>) -> Self {
        Self { key_field: key_field.into(),
               docs: BTreeMap::new() }
    }

    /// Inserta un documento extrayendo la clave de su campo de clave.
    pub fn insert(&mut self, doc: Value) -> Result<(), StoreError> {
        let key = doc.get(&self.key_field)
                     .and_then(Value::as_str)
                     .ok_or_else(|| StoreError::MissingKey(self.key_field.clone()))?
                     .to_string();
        self.docs.insert(key, doc);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Acceso directo por clave (azúcar de tests sobre `TargetStore::get`).
    pub fn get_doc(&self, key: &str) -> Option<&Value> {
        self.docs.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.docs.keys()
    }
}

impl SourceStore for InMemoryDocStore {
    fn query(&self, selector: &Selector) -> Result<Vec<Value>, StoreError> {
        let mut matched = Vec::new();
        for doc in self.docs.values() {
            if selector.matches(doc)? {
                matched.push(doc.clone());
            }
        }
        Ok(matched)
    }
}

impl TargetStore for InMemoryDocStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.docs.get(key).cloned())
    }

    fn upsert(&mut self, key: &str, doc: Value) -> Result<(), StoreError> {
        self.docs.insert(key.to_string(), doc);
        Ok(())
    }
}
