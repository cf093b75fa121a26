#[cfg(not(target_os = "linux"))]
fn main() {}

#[cfg(target_os = "linux")]
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
#[cfg(target_os = "linux")]
use kneeboard_shm::platform::current_pid;
#[cfg(target_os = "linux")]
use kneeboard_shm::texture::cpu::{CpuBackend, MemfdTexture};
#[cfg(target_os = "linux")]
use kneeboard_shm::{
    remove_namespace, ActiveConsumers, CachedReader, ConsumerKind, FrameConfig, HeaderFlags,
    LayerSubmission, PixelSize, ShmConfig, SystemClock, Writer,
};
#[cfg(target_os = "linux")]
use std::sync::Arc;

#[cfg(target_os = "linux")]
fn bench_config(tag: &str) -> ShmConfig {
    ShmConfig::with_namespace(format!("kneeboard-bench-{}-{}", tag, current_pid()))
}

#[cfg(target_os = "linux")]
fn bench_cached_snapshot(c: &mut Criterion) {
    let config = bench_config("snapshot");
    let consumers = Arc::new(ActiveConsumers::open(&config, Arc::new(SystemClock)).unwrap());
    let mut writer = Writer::create(&config, Arc::clone(&consumers)).unwrap();
    let mut reader =
        CachedReader::new(&config, Arc::clone(&consumers), ConsumerKind::Viewer, CpuBackend)
            .unwrap();

    let pages: Vec<MemfdTexture> = (0..4)
        .map(|_| MemfdTexture::new(PixelSize::new(256, 256)).unwrap())
        .collect();
    let layers: Vec<LayerSubmission<'_>> = pages
        .iter()
        .enumerate()
        .map(|(i, page)| LayerSubmission::new(i as u64 + 1, page))
        .collect();
    writer
        .publish(&FrameConfig::default(), HeaderFlags::empty(), &layers)
        .unwrap();
    assert!(reader.maybe_get_snapshot().is_valid());

    c.bench_function("maybe_get_snapshot_cached", |b| {
        b.iter(|| black_box(reader.maybe_get_snapshot().render_cache_key()))
    });

    drop(reader);
    drop(writer);
    remove_namespace(&config.namespace);
}

#[cfg(target_os = "linux")]
fn bench_publish(c: &mut Criterion) {
    let config = bench_config("publish");
    let consumers = Arc::new(ActiveConsumers::open(&config, Arc::new(SystemClock)).unwrap());
    let mut writer = Writer::create(&config, Arc::clone(&consumers)).unwrap();
    let pages: Vec<MemfdTexture> = (0..kneeboard_shm::MAX_LAYERS)
        .map(|_| MemfdTexture::new(PixelSize::new(64, 64)).unwrap())
        .collect();

    let mut group = c.benchmark_group("publish");
    for count in [0usize, 1, 4, kneeboard_shm::MAX_LAYERS] {
        let layers: Vec<LayerSubmission<'_>> = pages[..count]
            .iter()
            .enumerate()
            .map(|(i, page)| LayerSubmission::new(i as u64 + 1, page))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &layers, |b, layers| {
            b.iter(|| {
                black_box(
                    writer
                        .publish(&FrameConfig::default(), HeaderFlags::empty(), layers)
                        .unwrap(),
                )
            })
        });
    }
    group.finish();

    drop(writer);
    remove_namespace(&config.namespace);
}

#[cfg(target_os = "linux")]
fn bench_rejected_snapshot(c: &mut Criterion) {
    let config = bench_config("rejected");
    let consumers = Arc::new(ActiveConsumers::open(&config, Arc::new(SystemClock)).unwrap());
    let mut reader =
        CachedReader::new(&config, Arc::clone(&consumers), ConsumerKind::Viewer, CpuBackend)
            .unwrap();

    // No writer: the attach check short-circuits before any locking
    c.bench_function("maybe_get_snapshot_detached", |b| {
        b.iter(|| black_box(reader.maybe_get_snapshot().state()))
    });

    drop(reader);
    remove_namespace(&config.namespace);
}

#[cfg(target_os = "linux")]
criterion_group!(
    benches,
    bench_cached_snapshot,
    bench_publish,
    bench_rejected_snapshot
);
#[cfg(target_os = "linux")]
criterion_main!(benches);
