//! Configuración del builder.
//!
//! Valores razonables por defecto, con overrides opcionales por variables de
//! entorno (se intenta cargar `.env` primero). Sin estado global: la
//! configuración se construye y se inyecta en el builder.

use std::env;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Documentos por lote; dentro de un lote las transformaciones pueden
    /// paralelizarse, los upserts son siempre secuenciales.
    pub chunk_size: usize,
    /// Grado de paralelismo de la transformación (1 = secuencial).
    pub max_parallel: usize,
    /// Plazo por llamada al analizador; al vencerse el lado queda ausente.
    /// Siempre acotado por defecto: un analizador colgado no debe frenar la
    /// corrida. `None` (sólo por configuración explícita) lo deshabilita.
    pub site_timeout: Option<Duration>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self { chunk_size: 100,
               max_parallel: 1,
               site_timeout: Some(Duration::from_secs(30)) }
    }
}

impl BuilderConfig {
    /// Lee overrides de entorno: `COORDENV_CHUNK_SIZE`,
    /// `COORDENV_MAX_PARALLEL`, `COORDENV_SITE_TIMEOUT_MS` (0 deshabilita).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let mut cfg = Self::default();
        if let Some(v) = env_usize("COORDENV_CHUNK_SIZE") {
            cfg.chunk_size = v.max(1);
        }
        if let Some(v) = env_usize("COORDENV_MAX_PARALLEL") {
            cfg.max_parallel = v.max(1);
        }
        if let Some(ms) = env::var("COORDENV_SITE_TIMEOUT_MS").ok().and_then(|v| v.parse::<u64>().ok()) {
            cfg.site_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        cfg
    }
}

fn env_usize(name: &str) -> Option<usize> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
