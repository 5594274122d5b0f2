//! Transformación documento a documento.
//!
//! Orquesta las tres etapas sobre un documento crudo: resolver topología,
//! analizar cada sitio y agregar columnas. Total en el borde del documento:
//! los fallos internos degradan a campos ausentes, nunca se propagan.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use serde_json::Value;

use crate::aggregate::aggregate;
use crate::analyze::{CoordAnalyzer, SiteAnalyzer};
use crate::model::{EnrichedDoc, SitePair};
use crate::topology;

pub struct DocumentTransformer {
    site_analyzer: SiteAnalyzer,
}

impl DocumentTransformer {
    pub fn new(analyzer: Arc<dyn CoordAnalyzer>) -> Self {
        Self { site_analyzer: SiteAnalyzer::new(analyzer) }
    }

    /// Plazo por llamada al analizador; al vencerse, el lado queda ausente.
    pub fn with_site_timeout(mut self, timeout: Duration) -> Self {
        self.site_analyzer = self.site_analyzer.with_timeout(timeout);
        self
    }

    /// Transforma un documento crudo en su documento enriquecido. Nunca
    /// falla: un fallo a nivel de documento produce un placeholder
    /// determinista con la clave preservada.
    pub fn transform(&self, key: String, doc: &Value) -> EnrichedDoc {
        let topo = match topology::resolve(doc) {
            Ok(topo) => topo,
            Err(err) => {
                warn!("document {key}: {err}; emitting placeholder");
                return EnrichedDoc::placeholder(key);
            }
        };

        // Sin endpoints no hay ion de trabajo ni paths: análisis ausente.
        let Some(working_ion) = topo.working_ion else {
            debug!("document {key}: empty endpoint list");
            return EnrichedDoc::placeholder(key);
        };

        let end_points: Vec<SitePair> = topo.end_points
                                            .iter()
                                            .map(|record| self.site_analyzer.analyze_site(record, &working_ion))
                                            .collect();

        let mut images: BTreeMap<String, Vec<SitePair>> = BTreeMap::new();
        for (path, records) in &topo.images {
            let pairs = records.iter()
                               .map(|record| self.site_analyzer.analyze_site(record, &working_ion))
                               .collect();
            images.insert(path.raw.clone(), pairs);
        }

        let paths: Vec<_> = topo.images.iter().map(|(path, _)| path.clone()).collect();
        let coordination = aggregate(&end_points, &images, &paths);

        EnrichedDoc { key,
                      images,
                      end_points: Some(end_points),
                      coordination }
    }
}
