//! Translation of write-files steps to payloads, and extraction of the sink and
//! flags from graph nodes holding either a live configuration or a payload.

mod common;

use common::*;
use scrivener::NodeBody;
use scrivener::prelude::*;

/// Expected `(runner_determined_sharding, windowed_writes)` for each entry of `scenarios`.
const EXPECTED: [(bool, bool); 4] = [(true, false), (true, true), (false, false), (false, true)];

fn live_node(write: &WriteFiles) -> AppliedWriteNode {
    AppliedWriteNode::builder()
        .label("foo")
        .input("hello")
        .output("done")
        .build(write.clone())
}

fn restored_node(translation: &WriteFilesTranslation, write: &WriteFiles) -> AppliedWriteNode {
    let spec = translation
        .translate(&live_node(write))
        .expect("translate live node");
    AppliedWriteNode::builder()
        .label("foo")
        .input("hello")
        .output("done")
        .from_spec(&spec)
        .expect("restore node from spec")
}

#[test]
fn test_encoded_payload() {
    let translation = translation();
    for sink in [dummy_sink as fn() -> SinkHandle, file_sink] {
        for (write, (runner_determined, windowed)) in scenarios(sink).iter().zip(EXPECTED) {
            let payload = translation.to_payload(write).unwrap();

            assert_eq!(payload.runner_determined_sharding(), runner_determined);
            assert_eq!(
                payload.runner_determined_sharding(),
                write.num_shards().is_none() && write.sharding().is_none()
            );
            assert_eq!(payload.windowed_writes(), windowed);
            assert_eq!(payload.windowed_writes(), write.is_windowed_writes());

            let sink = translation.sink_from_payload(&payload).unwrap();
            assert_eq!(&sink, write.sink());
        }
    }
}

#[test]
fn test_from_payload_returns_flags_unchanged() {
    let translation = translation();
    for write in scenarios(dummy_sink) {
        let payload = translation.to_payload(&write).unwrap();
        let decoded = translation.from_payload(&payload).unwrap();
        assert_eq!(decoded.sink, *write.sink());
        assert_eq!(decoded.windowed_writes, payload.windowed_writes());
        assert_eq!(
            decoded.runner_determined_sharding,
            payload.runner_determined_sharding()
        );
    }
}

#[test]
fn test_extraction_direct_from_transform() {
    let translation = translation();
    for (write, (runner_determined, windowed)) in scenarios(dummy_sink).iter().zip(EXPECTED) {
        let node = live_node(write);

        assert_eq!(is_runner_determined_sharding(&node), runner_determined);
        assert_eq!(is_windowed_writes(&node), windowed);
        assert_eq!(&translation.get_sink(&node).unwrap(), write.sink());
    }
}

#[test]
fn test_extraction_from_restored_payload() {
    let translation = translation();
    for (write, (runner_determined, windowed)) in scenarios(dummy_sink).iter().zip(EXPECTED) {
        let node = restored_node(&translation, write);
        assert!(matches!(node.body(), NodeBody::Restored(_)));

        assert_eq!(is_runner_determined_sharding(&node), runner_determined);
        assert_eq!(is_windowed_writes(&node), windowed);
        assert_eq!(&translation.get_sink(&node).unwrap(), write.sink());
    }
}

#[test]
fn test_both_extraction_paths_agree() {
    let translation = translation();
    for sink in [dummy_sink as fn() -> SinkHandle, file_sink] {
        for write in scenarios(sink) {
            let live = live_node(&write);
            let restored = restored_node(&translation, &write);

            assert_eq!(live.properties(), restored.properties());
            assert_eq!(
                translation.get_sink(&live).unwrap(),
                translation.get_sink(&restored).unwrap()
            );
            assert_eq!(live.label(), restored.label());
            assert_eq!(live.inputs(), restored.inputs());
            assert_eq!(live.outputs(), restored.outputs());
        }
    }
}

#[test]
fn test_custom_sharding_function_survives_as_flag_only() {
    let translation = translation();
    let write = WriteFiles::to(file_sink()).with_sharding(HashSharding);
    let live = live_node(&write);
    let restored = restored_node(&translation, &write);

    assert!(!is_runner_determined_sharding(&live));
    assert!(!is_runner_determined_sharding(&restored));
    assert!(verify_sharding(&translation.to_payload(&write).unwrap(), &write).is_ok());
}

#[test]
fn test_every_sharding_row_lands_in_the_payload() {
    let translation = translation();
    let rows = [
        (WriteFiles::to(file_sink()), true),
        (WriteFiles::to(file_sink()).with_num_shards(shards(5)), false),
        (WriteFiles::to(file_sink()).with_sharding(HashSharding), false),
        (
            WriteFiles::to(file_sink())
                .with_num_shards(shards(5))
                .with_sharding(HashSharding),
            false,
        ),
    ];
    for (write, expected) in rows {
        let payload = translation.to_payload(&write).unwrap();
        assert_eq!(payload.runner_determined_sharding(), expected, "{:?}", write);

        let bytes = payload.encode_to_vec().unwrap();
        let decoded = WriteFilesPayload::decode(&bytes).unwrap();
        assert_eq!(decoded.runner_determined_sharding(), expected);
        assert!(verify_sharding(&decoded, &write).is_ok());
    }
}

#[test]
fn test_restored_node_translates_to_the_same_spec() {
    let translation = translation();
    let write = WriteFiles::to(dummy_sink()).with_num_shards(shards(3));
    let spec = translation.translate(&live_node(&write)).unwrap();
    let restored = AppliedWriteNode::builder().label("foo").from_spec(&spec).unwrap();

    assert_eq!(translation.translate(&restored).unwrap(), spec);
}

#[test]
fn test_payload_bytes_cross_the_boundary() {
    let sender = translation();
    let receiver = translation();
    let write = WriteFiles::to(file_sink()).with_windowed_writes();

    let bytes = sender.to_payload(&write).unwrap().encode_to_vec().unwrap();
    let payload = WriteFilesPayload::decode(&bytes).unwrap();
    let decoded = receiver.from_payload(&payload).unwrap();

    assert_eq!(decoded.sink, *write.sink());
    assert!(decoded.windowed_writes);
    assert!(decoded.runner_determined_sharding);
}

#[test]
fn test_restored_sink_still_enumerates_outputs() {
    let translation = translation();
    let write = WriteFiles::to(file_sink()).with_num_shards(shards(2));
    let node = restored_node(&translation, &write);

    let sink = translation.get_sink(&node).unwrap();
    let files: Vec<String> = sink
        .as_file_sink()
        .unwrap()
        .output_files(2)
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        files,
        vec![
            "/tmp/scrivener/out/part-00000-of-00002.txt.gz",
            "/tmp/scrivener/out/part-00001-of-00002.txt.gz",
        ]
    );
}
