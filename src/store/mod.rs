//! Colecciones de documentos con clave estable.
//!
//! El builder no conoce el backend: habla con un `SourceStore` (query por
//! predicado estructurado) y un `TargetStore` (lectura/upsert por clave).
//! `InMemoryDocStore` implementa ambos y sirve de doble para tests y
//! corridas locales.

pub mod memory;
pub mod selector;

use serde_json::Value;

use crate::errors::StoreError;

pub use memory::InMemoryDocStore;
pub use selector::Selector;

/// Colección fuente: evalúa un predicado y devuelve los documentos
/// candidatos. Backends reales empujan el predicado al motor de consultas;
/// el core sólo lo expresa.
pub trait SourceStore {
    fn query(&self, selector: &Selector) -> Result<Vec<Value>, StoreError>;
}

/// Colección destino, direccionada por clave estable. El upsert reemplaza el
/// documento entero: el destino nunca acumula campos viejos de una corrida
/// anterior.
pub trait TargetStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn upsert(&mut self, key: &str, doc: Value) -> Result<(), StoreError>;
}
