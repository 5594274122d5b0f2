//! Fingerprint canónico de documentos.
//!
//! El builder compara el documento transformado contra lo que ya existe en el
//! target para saltarse upserts sin cambios en corridas incrementales. La
//! comparación se hace sobre un render JSON canónico (claves de objeto en
//! orden lexicográfico, sin espacios) hasheado con blake3.

use serde_json::Value;
use std::collections::BTreeMap;

/// Render canónico de un `Value`: determinista para un mismo contenido,
/// independiente del orden de inserción de las claves.
pub fn canonical_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => serde_json::to_string(s).unwrap_or_default(),
        Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", rendered.join(","))
        }
        Value::Object(map) => {
            let sorted: BTreeMap<&String, &Value> = map.iter().collect();
            let rendered: Vec<String> = sorted.into_iter()
                                              .map(|(k, v)| {
                                                  let key = serde_json::to_string(k).unwrap_or_default();
                                                  format!("{}:{}", key, canonical_json(v))
                                              })
                                              .collect();
            format!("{{{}}}", rendered.join(","))
        }
    }
}

/// Fingerprint hex de un documento (blake3 sobre el render canónico).
pub fn doc_fingerprint(value: &Value) -> String {
    blake3::hash(canonical_json(value).as_bytes()).to_hex().to_string()
}
