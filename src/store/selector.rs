//! Predicados estructurados sobre documentos.
//!
//! Cubre las formas de consulta que usa el pipeline upstream: igualdad de
//! campo, pertenencia a conjunto (con semántica `$in` sobre campos array),
//! match por regex, existencia de campo y conjunción. Los campos admiten
//! rutas con punto (`"output.structure"`).

use regex::Regex;
use serde_json::Value;

use crate::errors::StoreError;

#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    All,
    Eq(String, Value),
    /// Verdadero si el valor del campo está en el conjunto; si el campo es un
    /// array, basta con que algún elemento lo esté.
    In(String, Vec<Value>),
    Regex(String, String),
    Exists(String),
    And(Vec<Selector>),
}

impl Selector {
    /// Evalúa el predicado contra un documento. Los stores reales delegan la
    /// evaluación a su backend; el store en memoria usa esto.
    pub fn matches(&self, doc: &Value) -> Result<bool, StoreError> {
        match self {
            Selector::All => Ok(true),
            Selector::Eq(field, expected) => Ok(lookup(doc, field) == Some(expected)),
            Selector::In(field, set) => {
                Ok(match lookup(doc, field) {
                    Some(Value::Array(items)) => items.iter().any(|item| set.contains(item)),
                    Some(value) => set.contains(value),
                    None => false,
                })
            }
            Selector::Regex(field, pattern) => {
                let re = Regex::new(pattern).map_err(|e| StoreError::Selector(e.to_string()))?;
                Ok(lookup(doc, field).and_then(Value::as_str).is_some_and(|s| re.is_match(s)))
            }
            Selector::Exists(field) => Ok(lookup(doc, field).is_some()),
            Selector::And(clauses) => {
                for clause in clauses {
                    if !clause.matches(doc)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }
}

fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(doc, |value, segment| value.get(segment))
}
