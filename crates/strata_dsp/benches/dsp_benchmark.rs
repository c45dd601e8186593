//! Performance benchmarks for the DSP core
//!
//! Run with: cargo bench -p strata_dsp

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use strata_dsp::{
    ring_fifo, AnalyzerTap, ChainSettings, CrossoverBand, MonoFilterChain, Slope, BAND_SHAPES,
};

fn benchmark_chain_processing(c: &mut Criterion) {
    let mut group = c.benchmark_group("mono_chain");

    let settings = ChainSettings {
        low_cut_freq: 100.0,
        low_cut_slope: Slope::Db48,
        peak_freq: 1000.0,
        peak_gain_db: 6.0,
        high_cut_freq: 10000.0,
        high_cut_slope: Slope::Db48,
        ..ChainSettings::default()
    };

    for size in [64, 128, 256, 512, 1024, 2048] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("process_{}_frames", size), |b| {
            let mut chain = MonoFilterChain::new();
            chain.update(48000.0, &settings);
            let mut buffer: Vec<f32> = (0..size).map(|i| (i as f32 * 0.001).sin()).collect();

            b.iter(|| {
                chain.process(black_box(&mut buffer));
            });
        });
    }

    group.finish();
}

fn benchmark_chain_update(c: &mut Criterion) {
    c.bench_function("chain_coefficient_recompute", |b| {
        let mut chain = MonoFilterChain::new();
        let mut settings = ChainSettings::default();

        b.iter(|| {
            // Simulate a moving parameter so every block redesigns
            settings.peak_freq = 500.0 + (settings.peak_freq % 1000.0);
            chain.update(black_box(48000.0), black_box(&settings));
        });
    });
}

fn benchmark_crossover_band(c: &mut Criterion) {
    let mut group = c.benchmark_group("crossover_band");

    for size in [256, 512, 1024] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("process_{}_frames", size), |b| {
            let mut band = CrossoverBand::new(BAND_SHAPES[5]);
            band.prepare(48000.0);
            band.update(48000.0, 3.0);
            let mut buffer: Vec<f32> = (0..size).map(|i| (i as f32 * 0.002).sin()).collect();

            b.iter(|| {
                band.process(black_box(&mut buffer));
            });
        });
    }

    group.finish();
}

fn benchmark_fifo_traffic(c: &mut Criterion) {
    c.bench_function("fifo_push_pop_512_sample_batch", |b| {
        let (mut producer, mut consumer) = ring_fifo(30, || vec![0.0_f32; 512]).unwrap();
        let batch = vec![0.25_f32; 512];
        let mut sink = vec![0.0_f32; 512];

        b.iter(|| {
            producer.push_with(|slot| slot.copy_from_slice(black_box(&batch)));
            consumer.pop_with(|slot| sink.copy_from_slice(slot));
            black_box(&mut sink);
        });
    });
}

fn benchmark_analyzer_tap(c: &mut Criterion) {
    c.bench_function("analyzer_tap_push_512", |b| {
        let (mut tap, mut outlet) = AnalyzerTap::new(512).unwrap();
        let block = vec![0.5_f32; 512];
        let mut batch = Vec::new();

        b.iter(|| {
            tap.push_samples(black_box(&block));
            outlet.pull_batch(&mut batch);
        });
    });
}

criterion_group!(
    benches,
    benchmark_chain_processing,
    benchmark_chain_update,
    benchmark_crossover_band,
    benchmark_fifo_traffic,
    benchmark_analyzer_tap
);

criterion_main!(benches);
