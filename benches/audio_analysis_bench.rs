//! Performance benchmarks for speech analysis

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use speech_scope::features::pitch::pyin;
use speech_scope::{extract_metrics, render_spectrogram, RenderConfig, Waveform};

/// Five seconds of a 220 Hz tone with a 2nd harmonic at 22.05 kHz
fn synthetic_voice() -> Waveform {
    let sample_rate = 22050;
    let samples: Vec<f32> = (0..sample_rate * 5)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            let phase = 2.0 * std::f64::consts::PI * 220.0 * t;
            (0.4 * phase.sin() + 0.2 * (2.0 * phase).sin()) as f32
        })
        .collect();
    Waveform::new(samples, sample_rate as u32).expect("valid sample rate")
}

/// Route `RUST_LOG` output from the library while benchmarking
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn bench_extract_metrics(c: &mut Criterion) {
    init_logging();
    let waveform = synthetic_voice();
    c.bench_function("extract_metrics_5s", |b| {
        b.iter(|| {
            let _ = extract_metrics(black_box(&waveform));
        });
    });
}

fn bench_pyin(c: &mut Criterion) {
    init_logging();
    let waveform = synthetic_voice();
    c.bench_function("pyin_5s", |b| {
        b.iter(|| {
            let _ = pyin(
                black_box(waveform.samples()),
                waveform.sample_rate(),
                50.0,
                4000.0,
                2048,
                512,
            );
        });
    });
}

fn bench_render(c: &mut Criterion) {
    init_logging();
    let waveform = synthetic_voice();
    let dir = tempfile::tempdir().expect("temp dir");
    let config = RenderConfig {
        output_dir: Some(dir.path().to_path_buf()),
        ..RenderConfig::default()
    };
    c.bench_function("render_spectrogram_5s", |b| {
        b.iter(|| {
            if let Ok(path) = render_spectrogram(black_box(&waveform), &config) {
                let _ = std::fs::remove_file(path);
            }
        });
    });
}

criterion_group!(benches, bench_extract_metrics, bench_pyin, bench_render);
criterion_main!(benches);
