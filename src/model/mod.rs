//! Modelos del dominio (payload de estructura, resultados de análisis,
//! documento enriquecido).

pub mod analysis;
pub mod structure;

pub use analysis::{CoordEnvRecord, Coordination, EnrichedDoc, SitePair};
pub use structure::{Lattice, Structure, StructureSite};
