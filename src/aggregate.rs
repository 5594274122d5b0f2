//! Agregación columnar de métricas por path.
//!
//! Reconstruye el orden estructural de cada path (endpoint de inicio,
//! imágenes, endpoint final) a partir de los registros ya analizados y emite
//! una lista ordenada por métrica y por path, alineada 1:1 con las
//! posiciones del path. `None` donde un lado no se pudo analizar.

use std::collections::BTreeMap;

use crate::model::{Coordination, SitePair};
use crate::topology::PathKey;

/// Agrega endpoints e imágenes analizados en las seis columnas de métricas.
/// `paths` trae únicamente claves ya validadas contra `end_points`, así que
/// la indexación de endpoints acá es segura por construcción.
pub fn aggregate(end_points: &[SitePair],
                 images: &BTreeMap<String, Vec<SitePair>>,
                 paths: &[PathKey])
                 -> Coordination {
    let mut coordination = Coordination::default();

    for path in paths {
        let image_pairs = images.get(&path.raw).map(Vec::as_slice).unwrap_or(&[]);

        // Mismo orden que la reconstrucción del path: inicio, imágenes, fin.
        let mut sequence: Vec<&SitePair> = Vec::with_capacity(image_pairs.len() + 2);
        sequence.push(&end_points[path.start]);
        sequence.extend(image_pairs.iter());
        sequence.push(&end_points[path.end]);

        let mut input_cn = Vec::with_capacity(sequence.len());
        let mut output_cn = Vec::with_capacity(sequence.len());
        let mut input_ce = Vec::with_capacity(sequence.len());
        let mut output_ce = Vec::with_capacity(sequence.len());
        let mut input_csm = Vec::with_capacity(sequence.len());
        let mut output_csm = Vec::with_capacity(sequence.len());

        for pair in sequence {
            input_cn.push(pair.input.as_ref().map(|r| r.coord_num));
            output_cn.push(pair.output.as_ref().map(|r| r.coord_num));
            input_ce.push(pair.input.as_ref().map(|r| r.coord_env.clone()));
            output_ce.push(pair.output.as_ref().map(|r| r.coord_env.clone()));
            input_csm.push(pair.input.as_ref().map(|r| r.csm));
            output_csm.push(pair.output.as_ref().map(|r| r.csm));
        }

        coordination.input_coord_num.insert(path.raw.clone(), input_cn);
        coordination.output_coord_num.insert(path.raw.clone(), output_cn);
        coordination.input_coord_env.insert(path.raw.clone(), input_ce);
        coordination.output_coord_env.insert(path.raw.clone(), output_ce);
        coordination.input_csm.insert(path.raw.clone(), input_csm);
        coordination.output_csm.insert(path.raw.clone(), output_csm);
    }

    coordination
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CoordEnvRecord;
    use serde_json::json;

    fn pair(input_cn: Option<u32>, output_cn: Option<u32>) -> SitePair {
        let record = |cn: u32| CoordEnvRecord { structure: json!({}),
                                                working_ion: "Mg".to_string(),
                                                coord_env: format!("C:{cn}"),
                                                coord_num: cn,
                                                csm: 0.1 };
        SitePair { input: input_cn.map(record), output: output_cn.map(record) }
    }

    fn key(raw: &str, start: usize, end: usize) -> PathKey {
        PathKey { raw: raw.to_string(), start, end }
    }

    #[test]
    fn columns_follow_structural_order() {
        let end_points = vec![pair(Some(4), Some(4)), pair(Some(6), Some(6)), pair(Some(5), Some(5))];
        let mut images = BTreeMap::new();
        images.insert("0+2".to_string(), vec![pair(Some(3), None)]);

        let coordination = aggregate(&end_points, &images, &[key("0+2", 0, 2)]);
        assert_eq!(coordination.input_coord_num["0+2"], vec![Some(4), Some(3), Some(5)]);
        assert_eq!(coordination.output_coord_num["0+2"], vec![Some(4), None, Some(5)]);
        assert_eq!(coordination.input_coord_env["0+2"],
                   vec![Some("C:4".to_string()), Some("C:3".to_string()), Some("C:5".to_string())]);
    }

    #[test]
    fn every_metric_list_matches_path_length() {
        let end_points = vec![pair(Some(4), Some(4)), pair(Some(6), None)];
        let mut images = BTreeMap::new();
        images.insert("0+1".to_string(), vec![pair(None, None), pair(Some(2), Some(2))]);

        let c = aggregate(&end_points, &images, &[key("0+1", 0, 1)]);
        for len in [c.input_coord_num["0+1"].len(),
                    c.output_coord_num["0+1"].len(),
                    c.input_coord_env["0+1"].len(),
                    c.output_coord_env["0+1"].len(),
                    c.input_csm["0+1"].len(),
                    c.output_csm["0+1"].len()] {
            assert_eq!(len, 4);
        }
    }

    #[test]
    fn no_paths_means_empty_columns() {
        let c = aggregate(&[pair(Some(1), Some(1))], &BTreeMap::new(), &[]);
        assert!(c.input_coord_num.is_empty());
        assert!(c.output_csm.is_empty());
    }
}
