use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use savedmodel_parser::SignatureExtractor;

// Wire-format fixture builders, mirroring the shapes the extractor consumes

fn push_varint(out: &mut Vec<u8>, mut val: u64) {
    loop {
        let byte = (val & 0x7f) as u8;
        val >>= 7;
        if val == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
}

fn push_varint_field(out: &mut Vec<u8>, field: u64, val: u64) {
    push_varint(out, field << 3);
    push_varint(out, val);
}

fn push_bytes_field(out: &mut Vec<u8>, field: u64, data: &[u8]) {
    push_varint(out, (field << 3) | 2);
    push_varint(out, data.len() as u64);
    out.extend_from_slice(data);
}

fn push_str_field(out: &mut Vec<u8>, field: u64, text: &str) {
    push_bytes_field(out, field, text.as_bytes());
}

fn encode_tensor_info(name: &str, dtype: u64, dims: &[i64]) -> Vec<u8> {
    let mut shape = Vec::new();
    for &size in dims {
        let mut dim = Vec::new();
        push_varint_field(&mut dim, 1, size as u64);
        push_bytes_field(&mut shape, 2, &dim);
    }

    let mut info = Vec::new();
    push_str_field(&mut info, 1, name);
    push_varint_field(&mut info, 2, dtype);
    push_bytes_field(&mut info, 3, &shape);
    info
}

fn encode_map_entry(key: &str, value: &[u8]) -> Vec<u8> {
    let mut entry = Vec::new();
    push_str_field(&mut entry, 1, key);
    push_bytes_field(&mut entry, 2, value);
    entry
}

fn encode_blob(signatures: usize, tensors_per_map: usize) -> Vec<u8> {
    let mut root = Vec::new();
    for sig_index in 0..signatures {
        let mut def = Vec::new();
        for tensor_index in 0..tensors_per_map {
            let alias = format!("input_{}", tensor_index);
            let info = encode_tensor_info(
                &format!("dense_{}/input:0", tensor_index),
                1,
                &[1, 224, 224, 3],
            );
            push_bytes_field(&mut def, 1, &encode_map_entry(&alias, &info));

            let alias = format!("output_{}", tensor_index);
            let info = encode_tensor_info(&format!("dense_{}/output:0", tensor_index), 1, &[1, 10]);
            push_bytes_field(&mut def, 2, &encode_map_entry(&alias, &info));
        }
        let name = format!("signature_{}", sig_index);
        push_bytes_field(&mut root, 5, &encode_map_entry(&name, &def));
    }
    root
}

// A blob dominated by fields the extractor has to skip over
fn encode_skip_heavy_blob(unknown_fields: usize) -> Vec<u8> {
    let mut root = Vec::new();
    for index in 0..unknown_fields {
        push_varint_field(&mut root, 100 + (index as u64 % 16), index as u64);
        push_str_field(&mut root, 200, "unrelated graph payload");
    }
    let def = {
        let mut def = Vec::new();
        let info = encode_tensor_info("input:0", 1, &[1, 28, 28, 1]);
        push_bytes_field(&mut def, 1, &encode_map_entry("input_1", &info));
        def
    };
    push_bytes_field(&mut root, 5, &encode_map_entry("serving_default", &def));
    root
}

fn bench_signature_decoding(c: &mut Criterion) {
    let extractor = SignatureExtractor::new();
    let mut group = c.benchmark_group("decode_signatures");

    for (signatures, tensors) in [(1, 2), (8, 8), (32, 16)] {
        let blob = encode_blob(signatures, tensors);
        group.throughput(Throughput::Bytes(blob.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("signatures", format!("{}x{}", signatures, tensors)),
            &blob,
            |b, blob| b.iter(|| extractor.extract(blob).unwrap()),
        );
    }
    group.finish();
}

fn bench_unknown_field_skipping(c: &mut Criterion) {
    let extractor = SignatureExtractor::new();
    let mut group = c.benchmark_group("skip_unknown_fields");

    for unknown_fields in [64, 1024] {
        let blob = encode_skip_heavy_blob(unknown_fields);
        group.throughput(Throughput::Bytes(blob.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(unknown_fields),
            &blob,
            |b, blob| b.iter(|| extractor.extract(blob).unwrap()),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_signature_decoding, bench_unknown_field_skipping);
criterion_main!(benches);
