//! Análisis por sitio con aislamiento de fallos.
//!
//! El algoritmo de análisis es un colaborador externo (`CoordAnalyzer`); el
//! core sólo garantiza que se aplica a cada lado de cada sitio y que todo
//! fallo (payload ausente, estructura malformada, error del analizador,
//! timeout, panic) se convierte en un lado ausente sin escalar.

pub mod cutoff;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::warn;
use serde_json::Value;

use crate::constants::{INPUT_STRUCTURE_FIELD, OUTPUT_STRUCTURE_POINTER};
use crate::errors::AnalyzerError;
use crate::model::{CoordEnvRecord, SitePair, Structure};

pub use cutoff::CutoffAnalyzer;

/// Métricas crudas que devuelve el analizador para un sitio; el payload de
/// estructura y el ion se adjuntan después en el registro persistido.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordEnv {
    pub coord_num: u32,
    /// Símbolo del entorno / motivo estructural, p. ej. `"O:6"`.
    pub env_symbol: String,
    /// Calidad de ajuste (continuous symmetry measure).
    pub csm: f64,
}

/// Colaborador de análisis del entorno de coordinación. Opaco para el core:
/// cualquier implementación determinista sirve.
pub trait CoordAnalyzer: Send + Sync {
    fn analyze(&self, structure: &Structure, element: &str) -> Result<CoordEnv, AnalyzerError>;
}

/// Aplica el analizador a los dos lados de un registro de sitio, aislando
/// fallos por lado.
pub struct SiteAnalyzer {
    analyzer: Arc<dyn CoordAnalyzer>,
    timeout: Option<Duration>,
}

impl SiteAnalyzer {
    pub fn new(analyzer: Arc<dyn CoordAnalyzer>) -> Self {
        Self { analyzer, timeout: None }
    }

    /// Corre cada llamada al analizador en un hilo auxiliar; si no responde
    /// dentro del plazo, el lado se registra como ausente.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Analiza los lados input y output de un registro de sitio. Total: nunca
    /// falla, los lados no analizables quedan en `None`.
    pub fn analyze_site(&self, record: &Value, element: &str) -> SitePair {
        SitePair { input: self.analyze_side(record.get(INPUT_STRUCTURE_FIELD), element, "input"),
                   output: self.analyze_side(record.pointer(OUTPUT_STRUCTURE_POINTER), element, "output") }
    }

    fn analyze_side(&self, payload: Option<&Value>, element: &str, side: &str) -> Option<CoordEnvRecord> {
        match self.try_side(payload, element) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("site {side} side not analyzed: {err}");
                None
            }
        }
    }

    fn try_side(&self, payload: Option<&Value>, element: &str) -> Result<CoordEnvRecord, AnalyzerError> {
        let payload = payload.filter(|v| !v.is_null()).ok_or(AnalyzerError::MissingStructure)?;
        let structure: Structure = serde_json::from_value(payload.clone())
            .map_err(|e| AnalyzerError::MalformedStructure(e.to_string()))?;
        let env = self.run_analyzer(structure, element)?;
        Ok(CoordEnvRecord { structure: payload.clone(),
                            working_ion: element.to_string(),
                            coord_env: env.env_symbol,
                            coord_num: env.coord_num,
                            csm: env.csm })
    }

    /// Invoca el analizador convirtiendo panics (y timeouts, si hay plazo
    /// configurado) en errores de sitio.
    fn run_analyzer(&self, structure: Structure, element: &str) -> Result<CoordEnv, AnalyzerError> {
        match self.timeout {
            None => {
                catch_unwind(AssertUnwindSafe(|| self.analyzer.analyze(&structure, element)))
                    .unwrap_or_else(|_| Err(AnalyzerError::Analysis("analyzer panicked".to_string())))
            }
            Some(timeout) => {
                let (tx, rx) = mpsc::channel();
                let analyzer = Arc::clone(&self.analyzer);
                let element = element.to_string();
                thread::spawn(move || {
                    let _ = tx.send(analyzer.analyze(&structure, &element));
                });
                match rx.recv_timeout(timeout) {
                    Ok(result) => result,
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        Err(AnalyzerError::Timeout(timeout.as_millis() as u64))
                    }
                    // El hilo murió sin responder (panic del analizador).
                    Err(mpsc::RecvTimeoutError::Disconnected) => {
                        Err(AnalyzerError::Analysis("analyzer panicked".to_string()))
                    }
                }
            }
        }
    }
}
