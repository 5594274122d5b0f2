//! Constantes del esquema de documentos.
//!
//! Nombres de campo del esquema approx-NEB upstream. Se centralizan aquí
//! porque participan tanto en la resolución de topología como en el análisis
//! por sitio; un cambio de esquema upstream se refleja en un solo lugar.

/// Campo de clave estable por convención de la colección approx-NEB.
pub const DEFAULT_KEY_FIELD: &str = "wf_uuid";

/// Alias legado de la lista de endpoints; tiene preferencia si está presente.
pub const STABLE_SITES_FIELD: &str = "stable_sites";
pub const END_POINTS_FIELD: &str = "end_points";

pub const IMAGES_FIELD: &str = "images";
pub const PATHFINDER_FIELD: &str = "pathfinder";
pub const RELAX_SITE_INDEXES_FIELD: &str = "relax_site_indexes";

pub const INPUT_STRUCTURE_FIELD: &str = "input_structure";
/// Ruta (estilo JSON pointer) de la estructura relajada dentro de un sitio.
pub const OUTPUT_STRUCTURE_POINTER: &str = "/output/structure";
