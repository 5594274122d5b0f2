//! Semántica incremental del builder: idempotencia, reemplazo total y
//! selección de candidatos.

mod common;

use std::sync::Arc;

use coordenv_builder::hashing::doc_fingerprint;
use coordenv_builder::{BuilderConfig, CutoffAnalyzer, IncrementalBuilder, InMemoryDocStore, Selector};
use serde_json::json;

fn builder() -> IncrementalBuilder {
    IncrementalBuilder::new(Arc::new(CutoffAnalyzer::default()))
}

fn seeded_source(keys: &[&str]) -> InMemoryDocStore {
    let mut source = InMemoryDocStore::new("wf_uuid");
    for key in keys {
        source.insert(common::two_endpoint_doc(key)).unwrap();
    }
    source
}

#[test]
fn rerun_without_changes_is_byte_identical_and_skipped() {
    let source = seeded_source(&["a", "b"]);
    let mut target = InMemoryDocStore::new("wf_uuid");
    let builder = builder();

    let first = builder.run(&source, &mut target, &Selector::All).unwrap();
    assert_eq!(first.written, 2);
    let snapshot: Vec<String> = target.keys()
                                      .map(|k| doc_fingerprint(target.get_doc(k).unwrap()))
                                      .collect();

    let second = builder.run(&source, &mut target, &Selector::All).unwrap();
    assert_eq!(second.written, 0);
    assert_eq!(second.unchanged, 2);

    let after: Vec<String> = target.keys()
                                   .map(|k| doc_fingerprint(target.get_doc(k).unwrap()))
                                   .collect();
    assert_eq!(snapshot, after);
}

#[test]
fn upsert_replaces_stale_document_wholesale() {
    let source = seeded_source(&["a"]);
    let mut target = InMemoryDocStore::new("wf_uuid");
    // Residuo de una corrida vieja con campos que ya no existen.
    coordenv_builder::TargetStore::upsert(&mut target, "a", json!({
        "wf_uuid": "a",
        "stale_field": true,
        "coordination": {"input_coord_num": {"9+9": [1, 2, 3]}},
    })).unwrap();

    builder().run(&source, &mut target, &Selector::All).unwrap();

    let doc = target.get_doc("a").unwrap();
    assert!(doc.get("stale_field").is_none());
    assert!(doc["coordination"]["input_coord_num"].get("9+9").is_none());
    assert!(doc["coordination"]["input_coord_num"].get("0+1").is_some());
}

#[test]
fn selector_narrows_the_candidate_set() {
    let mut source = InMemoryDocStore::new("wf_uuid");
    let mut tagged = common::two_endpoint_doc("tagged");
    tagged["batt_id"] = json!("Mg_spinel");
    tagged["tags"] = json!(["20191122_batch"]);
    tagged["last_updated"] = json!("2019-11-22");
    source.insert(tagged).unwrap();

    let mut other = common::two_endpoint_doc("other");
    other["batt_id"] = json!("Li_rocksalt");
    other["tags"] = json!(["20191122_batch"]);
    other["last_updated"] = json!("2019-11-22");
    source.insert(other).unwrap();

    let mut target = InMemoryDocStore::new("wf_uuid");
    let selector = Selector::And(vec![Selector::Regex("batt_id".into(), "Mg".into()),
                                      Selector::In("tags".into(), vec![json!("20191122_batch")]),
                                      Selector::Exists("last_updated".into())]);

    let report = builder().run(&source, &mut target, &selector).unwrap();
    assert_eq!(report.matched, 1);
    assert!(target.get_doc("tagged").is_some());
    assert!(target.get_doc("other").is_none());
}

#[test]
fn source_edit_triggers_rewrite_of_that_document_only() {
    let mut source = seeded_source(&["a", "b"]);
    let mut target = InMemoryDocStore::new("wf_uuid");
    let builder = builder();
    builder.run(&source, &mut target, &Selector::All).unwrap();

    // Cambia la topología de "a": ahora la imagen pierde su output.
    let mut edited = common::two_endpoint_doc("a");
    edited["images"]["0+1"] = json!([common::site_without_output(3)]);
    source.insert(edited).unwrap();

    let report = builder.run(&source, &mut target, &Selector::All).unwrap();
    assert_eq!(report.written, 1);
    assert_eq!(report.unchanged, 1);
    let doc = target.get_doc("a").unwrap();
    assert!(doc["coordination"]["output_coord_num"]["0+1"][1].is_null());
}

#[test]
fn parallel_and_sequential_runs_converge_to_the_same_state() {
    let source = seeded_source(&["a", "b", "c", "d"]);

    let mut sequential = InMemoryDocStore::new("wf_uuid");
    builder().run(&source, &mut sequential, &Selector::All).unwrap();

    let parallel_cfg = BuilderConfig { chunk_size: 2, max_parallel: 4, ..BuilderConfig::default() };
    let parallel_builder = IncrementalBuilder::with_config(Arc::new(CutoffAnalyzer::default()), parallel_cfg);
    let mut parallel = InMemoryDocStore::new("wf_uuid");
    parallel_builder.run(&source, &mut parallel, &Selector::All).unwrap();

    let seq_keys: Vec<&str> = sequential.keys().map(String::as_str).collect();
    let par_keys: Vec<&str> = parallel.keys().map(String::as_str).collect();
    assert_eq!(seq_keys, par_keys);
    for key in seq_keys {
        assert_eq!(doc_fingerprint(sequential.get_doc(key).unwrap()),
                   doc_fingerprint(parallel.get_doc(key).unwrap()));
    }
}
