//! Resultados de análisis por sitio y documento enriquecido.
//!
//! Todas las colecciones asociativas son `BTreeMap` para que la serialización
//! sea determinista: correr el builder dos veces sobre la misma entrada debe
//! producir documentos byte-idénticos.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Resultado persistido del análisis de un lado (input u output) de un sitio.
/// Conserva el payload de estructura fuente y el ion de trabajo junto con las
/// métricas del entorno de coordinación.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoordEnvRecord {
    pub structure: Value,
    pub working_ion: String,
    /// Símbolo del entorno / motivo estructural, p. ej. `"O:6"`.
    pub coord_env: String,
    pub coord_num: u32,
    /// Medida escalar de calidad del ajuste (continuous symmetry measure).
    pub csm: f64,
}

/// Par de análisis de un sitio: lado input (estructura inicial) y lado output
/// (estructura relajada). Cualquiera de los dos puede estar ausente.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SitePair {
    pub input: Option<CoordEnvRecord>,
    pub output: Option<CoordEnvRecord>,
}

/// Columna de una métrica: clave de path → lista ordenada de valores, una
/// posición por sitio del path (None donde el lado no se pudo analizar).
pub type MetricColumn<T> = BTreeMap<String, Vec<Option<T>>>;

/// Agregación columnar de las seis métricas seguidas a lo largo de cada path.
/// La forma plana (métrica → path → lista) permite consultar "coord_num del
/// path X en la posición N" sin re-caminar el path.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Coordination {
    pub input_coord_num: MetricColumn<u32>,
    pub output_coord_num: MetricColumn<u32>,
    pub input_coord_env: MetricColumn<String>,
    pub output_coord_env: MetricColumn<String>,
    pub input_csm: MetricColumn<f64>,
    pub output_csm: MetricColumn<f64>,
}

/// Documento de salida: análisis por sitio más la agregación columnar.
/// Se recalcula entero en cada build; nunca se parchea parcialmente.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedDoc {
    /// Clave estable heredada del documento fuente. Se serializa bajo el
    /// nombre de campo configurado en el builder, no acá.
    #[serde(skip)]
    pub key: String,
    pub images: BTreeMap<String, Vec<SitePair>>,
    pub end_points: Option<Vec<SitePair>>,
    pub coordination: Coordination,
}

impl EnrichedDoc {
    /// Salida determinista para un documento cuya topología no se pudo
    /// resolver: campos de análisis vacíos/ausentes pero clave preservada.
    pub fn placeholder(key: String) -> Self {
        Self { key,
               images: BTreeMap::new(),
               end_points: None,
               coordination: Coordination::default() }
    }

    /// Serializa a `Value` inyectando la clave bajo `key_field`.
    pub fn to_value(&self, key_field: &str) -> serde_json::Result<Value> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            map.insert(key_field.to_string(), Value::String(self.key.clone()));
        }
        Ok(value)
    }
}
