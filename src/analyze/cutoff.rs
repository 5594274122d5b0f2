//! Analizador de respaldo por radio de corte.
//!
//! Cuenta vecinos dentro de un radio alrededor del sitio del ion de trabajo.
//! Es el doble determinista que usan los tests y las corridas locales; un
//! despliegue real inyecta su propio `CoordAnalyzer` (CrystalNN, ChemEnv,
//! etc.). No considera imágenes periódicas: trabaja sobre las coordenadas
//! cartesianas tal cual vienen en el payload.

use crate::errors::AnalyzerError;
use crate::model::Structure;

use super::{CoordAnalyzer, CoordEnv};

pub struct CutoffAnalyzer {
    /// Radio de corte en ångströms.
    pub cutoff: f64,
}

impl Default for CutoffAnalyzer {
    fn default() -> Self {
        Self { cutoff: 3.0 }
    }
}

impl CutoffAnalyzer {
    pub fn new(cutoff: f64) -> Self {
        Self { cutoff }
    }
}

impl CoordAnalyzer for CutoffAnalyzer {
    fn analyze(&self, structure: &Structure, element: &str) -> Result<CoordEnv, AnalyzerError> {
        let (ion_index, center) = structure.find_site(element)
                                           .ok_or_else(|| AnalyzerError::IonNotFound(element.to_string()))?;

        let mut distances = Vec::new();
        for (i, site) in structure.sites.iter().enumerate() {
            if i == ion_index {
                continue;
            }
            let d = distance(center, site.xyz);
            if d <= self.cutoff {
                distances.push(d);
            }
        }

        let coord_num = distances.len() as u32;
        // Dispersión relativa de las distancias a vecinos como medida cruda
        // de calidad del ajuste: 0.0 para un entorno perfectamente regular.
        let csm = spread(&distances);
        Ok(CoordEnv { coord_num,
                      env_symbol: format!("C:{coord_num}"),
                      csm })
    }
}

fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

fn spread(distances: &[f64]) -> f64 {
    if distances.is_empty() {
        return 0.0;
    }
    let mean = distances.iter().sum::<f64>() / distances.len() as f64;
    if mean == 0.0 {
        return 0.0;
    }
    let var = distances.iter().map(|d| (d - mean) * (d - mean)).sum::<f64>() / distances.len() as f64;
    var.sqrt() / mean
}
