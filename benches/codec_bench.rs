// In mzbin-core/benches/codec_bench.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use mzbin::pipeline::{Codec, CodecPipeline};
use mzbin::types::{NumericType, NumpressVariant};

// --- Mock Data Generation ---

/// An m/z-like series: increasing, with small irregular steps.
fn generate_mz_array(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 200.0 + i as f64 * 0.0125 + ((i * 7919) % 13) as f64 * 1e-5)
        .collect()
}

/// An intensity-like series: mostly low values with periodic peaks.
fn generate_intensity_array(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| if i % 97 == 0 { 1.0e6 / (1 + i % 5) as f64 } else { (i % 31) as f64 * 3.5 })
        .collect()
}

// --- Benchmark Suite ---

const BENCH_ARRAY_LEN: usize = 16_384;

fn pipelines() -> Vec<(&'static str, CodecPipeline)> {
    let len = BENCH_ARRAY_LEN * 8;
    vec![
        ("plain", CodecPipeline::new()),
        ("zlib", CodecPipeline::new().with(Codec::Deflate { chunk_size: 1024 })),
        ("lz4", CodecPipeline::new().with(Codec::Lz4 { decompressed_len: len })),
        (
            "zstd",
            CodecPipeline::new().with(Codec::Zstd {
                decompressed_len: len,
                level: 3,
            }),
        ),
        (
            "float32+zlib",
            CodecPipeline::new()
                .with(Codec::Numeric {
                    from: NumericType::Float64,
                    to: NumericType::Float32,
                })
                .with(Codec::Deflate { chunk_size: 1024 }),
        ),
        (
            "numpress-linear",
            CodecPipeline::new().with(Codec::Numpress {
                variant: NumpressVariant::Linear,
                fixed_point: None,
            }),
        ),
        (
            "numpress-slof",
            CodecPipeline::new().with(Codec::Numpress {
                variant: NumpressVariant::Slof,
                fixed_point: None,
            }),
        ),
    ]
}

fn bench_pipelines(c: &mut Criterion) {
    let inputs = [
        ("mz", generate_mz_array(BENCH_ARRAY_LEN)),
        ("intensity", generate_intensity_array(BENCH_ARRAY_LEN)),
    ];

    let mut group = c.benchmark_group("Codec Pipelines");
    group.throughput(Throughput::Bytes((BENCH_ARRAY_LEN * 8) as u64));

    for (input_name, values) in &inputs {
        for (pipeline_name, pipeline) in pipelines() {
            let encoded = pipeline.encode_array(values).unwrap();

            group.bench_function(format!("Encode {} ({})", pipeline_name, input_name), |b| {
                b.iter(|| black_box(pipeline.encode_array(black_box(values))))
            });
            group.bench_function(format!("Decode {} ({})", pipeline_name, input_name), |b| {
                b.iter(|| black_box(pipeline.decode_array(black_box(&encoded))))
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_pipelines);
criterion_main!(benches);
