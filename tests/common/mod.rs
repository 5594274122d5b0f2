//! Fixtures compartidas por los tests de integración: documentos approx-NEB
//! sintéticos con estructuras Mg-O pequeñas.
#![allow(dead_code)]

use serde_json::{json, Value};

/// Estructura con un Mg en el origen y `oxygens` vecinos O a 2 Å.
pub fn mg_structure(oxygens: usize) -> Value {
    let offsets = [[2.0, 0.0, 0.0], [-2.0, 0.0, 0.0], [0.0, 2.0, 0.0],
                   [0.0, -2.0, 0.0], [0.0, 0.0, 2.0], [0.0, 0.0, -2.0]];
    let mut sites = vec![json!({"label": "Mg", "xyz": [0.0, 0.0, 0.0]})];
    for offset in offsets.iter().take(oxygens) {
        sites.push(json!({"label": "O", "xyz": offset}));
    }
    json!({"sites": sites})
}

/// Registro de sitio con ambos lados presentes.
pub fn site(input_oxygens: usize, output_oxygens: usize) -> Value {
    json!({
        "input_structure": mg_structure(input_oxygens),
        "output": {"structure": mg_structure(output_oxygens)},
    })
}

/// Registro de sitio sin estructura relajada.
pub fn site_without_output(input_oxygens: usize) -> Value {
    json!({"input_structure": mg_structure(input_oxygens)})
}

/// Documento mínimo de dos endpoints y una imagen en el path "0+1".
pub fn two_endpoint_doc(key: &str) -> Value {
    json!({
        "wf_uuid": key,
        "end_points": [site(4, 4), site(5, 5)],
        "images": {"0+1": [site(3, 3)]},
        "pathfinder": {"0+1": {"relax_site_indexes": [0]}},
    })
}
