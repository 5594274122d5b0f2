//! Builder incremental map-style sobre colecciones con clave.
//!
//! Selecciona documentos candidatos en la fuente vía un `Selector`,
//! transforma cada uno de forma independiente y hace upsert en el destino
//! bajo la clave estable del documento. Idempotente: volver a correr sin
//! cambios en la fuente ni en el analizador deja el destino byte-idéntico
//! (y los upserts sin cambios se saltan por comparación de fingerprint).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::analyze::CoordAnalyzer;
use crate::config::BuilderConfig;
use crate::constants::DEFAULT_KEY_FIELD;
use crate::errors::StoreError;
use crate::hashing::doc_fingerprint;
use crate::store::{Selector, SourceStore, TargetStore};
use crate::transform::DocumentTransformer;

/// Resumen de una corrida, para reporte del operador.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Documentos que el selector dejó pasar.
    pub matched: usize,
    pub written: usize,
    /// Saltados porque el destino ya tenía contenido idéntico.
    pub unchanged: usize,
    /// Fallos por documento (clave ausente, serialización); nunca abortan.
    pub failed: usize,
}

pub struct IncrementalBuilder {
    transformer: DocumentTransformer,
    key_field: String,
    config: BuilderConfig,
}

impl IncrementalBuilder {
    pub fn new(analyzer: Arc<dyn CoordAnalyzer>) -> Self {
        Self::with_config(analyzer, BuilderConfig::default())
    }

    pub fn with_config(analyzer: Arc<dyn CoordAnalyzer>, config: BuilderConfig) -> Self {
        let mut transformer = DocumentTransformer::new(analyzer);
        if let Some(timeout) = config.site_timeout {
            transformer = transformer.with_site_timeout(timeout);
        }
        Self { transformer,
               key_field: DEFAULT_KEY_FIELD.to_string(),
               config }
    }

    /// Campo de clave estable del despliegue (convención: `wf_uuid`).
    pub fn with_key_field(mut self, key_field: impl Into<String>) -> Self {
        self.key_field = key_field.into();
        self
    }

    /// Corre el pipeline completo: query -> transform -> upsert. Errores por
    /// documento se loguean y cuentan; errores de store son fatales.
    pub fn run<S, T>(&self, source: &S, target: &mut T, selector: &Selector) -> Result<RunReport, StoreError>
        where S: SourceStore,
              T: TargetStore
    {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();

        let docs = source.query(selector)?;
        info!("run {run_id}: {} candidate documents", docs.len());

        let mut written = 0usize;
        let mut unchanged = 0usize;
        let mut failed = 0usize;

        let pool = self.build_pool();
        for chunk in docs.chunks(self.config.chunk_size.max(1)) {
            for prepared in self.prepare_chunk(chunk, pool.as_ref()) {
                let Some((key, value)) = prepared else {
                    failed += 1;
                    continue;
                };
                // Saltar upserts cuyo contenido no cambió: corridas repetidas
                // convergen sin reescribir el destino entero.
                let fingerprint = doc_fingerprint(&value);
                let existing = target.get(&key)?;
                if existing.as_ref().map(doc_fingerprint).as_deref() == Some(fingerprint.as_str()) {
                    debug!("run {run_id}: {key} unchanged, skipping upsert");
                    unchanged += 1;
                } else {
                    target.upsert(&key, value)?;
                    written += 1;
                }
            }
        }

        let report = RunReport { run_id,
                                 started_at,
                                 finished_at: Utc::now(),
                                 matched: docs.len(),
                                 written,
                                 unchanged,
                                 failed };
        info!("run {run_id}: matched={} written={written} unchanged={unchanged} failed={failed}",
              report.matched);
        Ok(report)
    }

    /// Pool acotado para las transformaciones, si se pidió paralelismo.
    fn build_pool(&self) -> Option<rayon::ThreadPool> {
        if self.config.max_parallel <= 1 {
            return None;
        }
        match rayon::ThreadPoolBuilder::new().num_threads(self.config.max_parallel).build() {
            Ok(pool) => Some(pool),
            Err(err) => {
                warn!("thread pool unavailable ({err}), falling back to sequential");
                None
            }
        }
    }

    /// Transforma un lote, en el pool si hay uno. Los upserts quedan fuera:
    /// siempre secuenciales, en orden de entrada.
    fn prepare_chunk(&self, chunk: &[Value], pool: Option<&rayon::ThreadPool>) -> Vec<Option<(String, Value)>> {
        match pool {
            Some(pool) => pool.install(|| chunk.par_iter().map(|doc| self.prepare(doc)).collect()),
            None => chunk.iter().map(|doc| self.prepare(doc)).collect(),
        }
    }

    /// Transforma un documento en su par (clave, valor de salida). `None` es
    /// un fallo por documento ya logueado.
    fn prepare(&self, doc: &Value) -> Option<(String, Value)> {
        let Some(key) = doc.get(&self.key_field).and_then(Value::as_str) else {
            warn!("document without string key field '{}', skipped", self.key_field);
            return None;
        };
        let enriched = self.transformer.transform(key.to_string(), doc);
        match enriched.to_value(&self.key_field) {
            Ok(value) => Some((key.to_string(), value)),
            Err(err) => {
                warn!("document {key}: serialization failed: {err}");
                None
            }
        }
    }
}
