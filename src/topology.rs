//! Resolución de topología de paths a partir del documento crudo.
//!
//! Un documento approx-NEB trae una lista plana de endpoints y un mapa
//! `images` cuyas claves `"i+j"` referencian índices de esa lista. Acá se
//! reconstruye la lista ordenada de paths válidos y se resuelve el ion de
//! trabajo del documento. Claves inválidas son fallos a nivel de path
//! (se saltan con warn); la ausencia de endpoints o un lookup de ion fallido
//! son fallos a nivel de documento.

use log::warn;
use serde_json::Value;

use crate::constants::{END_POINTS_FIELD, IMAGES_FIELD, INPUT_STRUCTURE_FIELD, PATHFINDER_FIELD,
                       RELAX_SITE_INDEXES_FIELD, STABLE_SITES_FIELD};
use crate::errors::{BuildError, PathError};

/// Clave de path `"i+j"` ya validada contra la lista de endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathKey {
    pub raw: String,
    pub start: usize,
    pub end: usize,
}

impl PathKey {
    /// Parsea `"i+j"` en índices; no valida rangos.
    pub fn parse(raw: &str) -> Result<(usize, usize), PathError> {
        let (start, end) = raw.split_once('+').ok_or_else(|| PathError::BadKey(raw.to_string()))?;
        let start = start.parse().map_err(|_| PathError::BadKey(raw.to_string()))?;
        let end = end.parse().map_err(|_| PathError::BadKey(raw.to_string()))?;
        Ok((start, end))
    }
}

/// Topología resuelta de un documento: registros de endpoint crudos, ion de
/// trabajo (ausente si no hay endpoints) y los paths válidos en orden
/// lexicográfico de clave, cada uno con sus registros de imagen crudos.
#[derive(Debug, Clone)]
pub struct ResolvedTopology {
    pub working_ion: Option<String>,
    pub end_points: Vec<Value>,
    pub images: Vec<(PathKey, Vec<Value>)>,
}

/// Resuelve la topología del documento. Falla sólo a nivel de documento;
/// los fallos por path se loguean y se saltan.
pub fn resolve(doc: &Value) -> Result<ResolvedTopology, BuildError> {
    let end_points = endpoint_list(doc)?;

    // Sin endpoints no hay ion ni paths; el documento igual produce salida
    // (placeholder determinista aguas abajo).
    if end_points.is_empty() {
        return Ok(ResolvedTopology { working_ion: None,
                                     end_points,
                                     images: Vec::new() });
    }

    let working_ion = resolve_working_ion(doc, &end_points)?;
    let images = valid_paths(doc, end_points.len());

    Ok(ResolvedTopology { working_ion: Some(working_ion),
                          end_points,
                          images })
}

/// Lista de endpoints: el alias legado `stable_sites` tiene preferencia sobre
/// `end_points`. Ninguno de los dos presente es un fallo de documento.
fn endpoint_list(doc: &Value) -> Result<Vec<Value>, BuildError> {
    for field in [STABLE_SITES_FIELD, END_POINTS_FIELD] {
        if let Some(list) = doc.get(field).and_then(Value::as_array) {
            return Ok(list.clone());
        }
    }
    Err(BuildError::MissingTopology)
}

/// Ion de trabajo del documento: primera entrada de `pathfinder` →
/// `relax_site_indexes[0]` = k → etiqueta del sitio k de la estructura de
/// entrada del endpoint 0. El lookup no tiene fallback: cualquier pieza
/// ausente o malformada es un fallo de documento.
fn resolve_working_ion(doc: &Value, end_points: &[Value]) -> Result<String, BuildError> {
    let lookup = |reason: &str| BuildError::WorkingIonLookup(reason.to_string());

    let pathfinder = doc.get(PATHFINDER_FIELD)
                        .and_then(Value::as_object)
                        .ok_or_else(|| lookup("missing 'pathfinder'"))?;
    let first_entry = pathfinder.values().next().ok_or_else(|| lookup("empty 'pathfinder'"))?;
    let ion_index = first_entry.get(RELAX_SITE_INDEXES_FIELD)
                               .and_then(Value::as_array)
                               .and_then(|idx| idx.first())
                               .and_then(Value::as_u64)
                               .ok_or_else(|| lookup("missing 'relax_site_indexes[0]'"))?;

    let sites = end_points[0].get(INPUT_STRUCTURE_FIELD)
                             .and_then(|s| s.get("sites"))
                             .and_then(Value::as_array)
                             .ok_or_else(|| lookup("endpoint 0 has no input_structure.sites"))?;
    sites.get(ion_index as usize)
         .and_then(|site| site.get("label"))
         .and_then(Value::as_str)
         .map(str::to_string)
         .ok_or_else(|| lookup(&format!("no site label at relax index {ion_index}")))
}

/// Claves de `images` en orden lexicográfico, validadas contra la cantidad de
/// endpoints. `images` ausente equivale a un mapa vacío.
fn valid_paths(doc: &Value, endpoint_count: usize) -> Vec<(PathKey, Vec<Value>)> {
    let Some(images) = doc.get(IMAGES_FIELD).and_then(Value::as_object) else {
        return Vec::new();
    };

    // El orden de inserción del mapa no es significativo; se ordena por clave
    // para que la salida sea reproducible documento a documento.
    let mut entries: Vec<(&String, &Value)> = images.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut paths = Vec::with_capacity(entries.len());
    for (raw, sites) in entries {
        match validate_path(raw, sites, endpoint_count) {
            Ok(path) => paths.push(path),
            Err(err) => warn!("skipping path: {err}"),
        }
    }
    paths
}

fn validate_path(raw: &str, sites: &Value, endpoint_count: usize) -> Result<(PathKey, Vec<Value>), PathError> {
    let (start, end) = PathKey::parse(raw)?;
    for index in [start, end] {
        if index >= endpoint_count {
            return Err(PathError::EndpointOutOfRange { key: raw.to_string(),
                                                       index,
                                                       len: endpoint_count });
        }
    }
    let sites = sites.as_array().ok_or_else(|| PathError::BadImageList(raw.to_string()))?;
    Ok((PathKey { raw: raw.to_string(), start, end }, sites.clone()))
}
