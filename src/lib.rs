//! coordenv-builder: builder incremental de análisis de entorno de coordinación
//! sobre documentos de paths de difusión (endpoints + imágenes approx-NEB).
//!
//! El núcleo es un map-builder sobre colecciones de documentos con clave
//! estable: selecciona candidatos vía un `Selector`, reconstruye la topología
//! de paths de cada documento, aplica un `CoordAnalyzer` inyectado a cada
//! sitio (con aislamiento de fallos por sitio) y agrega las métricas en
//! columnas por path antes de persistir el documento enriquecido.
pub mod aggregate;
pub mod analyze;
pub mod builder;
pub mod config;
pub mod constants;
pub mod errors;
pub mod hashing;
pub mod model;
pub mod store;
pub mod topology;
pub mod transform;

pub use analyze::{CoordAnalyzer, CoordEnv, CutoffAnalyzer, SiteAnalyzer};
pub use builder::{IncrementalBuilder, RunReport};
pub use config::BuilderConfig;
pub use errors::{AnalyzerError, BuildError, PathError, StoreError};
pub use model::{CoordEnvRecord, Coordination, EnrichedDoc, SitePair};
pub use store::{InMemoryDocStore, Selector, SourceStore, TargetStore};
pub use transform::DocumentTransformer;
