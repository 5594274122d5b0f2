//! Payload mínimo de estructura atómica (forma `as_dict` estilo pymatgen).
//!
//! El esquema upstream serializa estructuras como `{lattice, sites: [...]}`;
//! acá sólo se tipa lo que el análisis necesita (etiqueta de especie y
//! coordenadas cartesianas). Campos desconocidos se ignoran al deserializar
//! y el payload original se conserva crudo en el documento de salida.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Structure {
    #[serde(default)]
    pub lattice: Option<Lattice>,
    pub sites: Vec<StructureSite>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lattice {
    pub matrix: [[f64; 3]; 3],
}

/// Un sitio de la estructura. `label` es la etiqueta de especie con la que se
/// busca el ion de trabajo; `xyz` son coordenadas cartesianas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructureSite {
    pub label: String,
    pub xyz: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abc: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<Value>,
}

impl Structure {
    /// Índice y coordenadas del primer sitio cuya etiqueta coincide con el
    /// elemento dado, si existe.
    pub fn find_site(&self, element: &str) -> Option<(usize, [f64; 3])> {
        self.sites
            .iter()
            .enumerate()
            .find(|(_, site)| site.label == element)
            .map(|(i, site)| (i, site.xyz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_pymatgen_like_payload() {
        let payload = json!({
            "lattice": {"matrix": [[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]], "volume": 64.0},
            "sites": [
                {"label": "Mg", "xyz": [0.0, 0.0, 0.0], "abc": [0.0, 0.0, 0.0], "species": [{"element": "Mg", "occu": 1}]},
                {"label": "O", "xyz": [2.0, 0.0, 0.0]},
            ],
        });
        let s: Structure = serde_json::from_value(payload).unwrap();
        assert_eq!(s.sites.len(), 2);
        assert_eq!(s.find_site("O"), Some((1, [2.0, 0.0, 0.0])));
        assert_eq!(s.find_site("Li"), None);
    }

    #[test]
    fn rejects_payload_without_sites() {
        let payload = json!({"lattice": null});
        assert!(serde_json::from_value::<Structure>(payload).is_err());
    }
}
