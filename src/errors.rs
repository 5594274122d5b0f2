//! Errores del builder, separados por nivel de aislamiento.
//!
//! La jerarquía sigue la política de fallos del pipeline: un error de sitio
//! nunca escala a path, uno de path nunca escala a documento y uno de
//! documento nunca aborta la corrida. Sólo `StoreError` es fatal.

use thiserror::Error;

/// Fallo a nivel de documento: la topología no se pudo resolver. El builder
/// emite un placeholder con la clave original y sigue con el resto.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum BuildError {
    #[error("no endpoint list present (neither 'stable_sites' nor 'end_points')")] MissingTopology,
    #[error("working-ion lookup failed: {0}")] WorkingIonLookup(String),
}

/// Fallo a nivel de path: una clave de `images` inválida. El path se salta,
/// sus hermanos en el mismo documento quedan intactos.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum PathError {
    #[error("unparseable path key '{0}'")] BadKey(String),
    #[error("path key '{key}': endpoint index {index} out of range (len {len})")]
    EndpointOutOfRange { key: String, index: usize, len: usize },
    #[error("path key '{0}': image list is not an array")] BadImageList(String),
}

/// Fallo a nivel de sitio: un lado (input u output) no se pudo analizar.
/// El lado queda ausente; el lado hermano y los demás sitios no se afectan.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("structure payload missing")] MissingStructure,
    #[error("malformed structure payload: {0}")] MalformedStructure(String),
    #[error("working ion '{0}' not found in structure sites")] IonNotFound(String),
    #[error("analysis failed: {0}")] Analysis(String),
    #[error("analysis timed out after {0} ms")] Timeout(u64),
}

/// Fallo a nivel de run: el store subyacente falló. Fatal para la corrida;
/// no hay riesgo de documento a medio escribir porque el upsert es por clave.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("query failed: {0}")] Query(String),
    #[error("read failed for key '{key}': {reason}")] Read { key: String, reason: String },
    #[error("upsert failed for key '{key}': {reason}")] Upsert { key: String, reason: String },
    #[error("document has no usable key field '{0}'")] MissingKey(String),
    #[error("invalid selector: {0}")] Selector(String),
}
