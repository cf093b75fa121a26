//! Example consumer (reader)
//!
//! Polls a namespace once per "frame" and prints whenever the snapshot
//! changes. Run it next to `feeder`.

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn main() {
    eprintln!("the poll demo imports memfd textures and needs Linux");
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn main() {
    use kneeboard_shm::texture::cpu::CpuBackend;
    use kneeboard_shm::{ActiveConsumers, CachedReader, ConsumerKind, ShmConfig, SnapshotState, SystemClock};
    use std::sync::Arc;
    use std::time::Duration;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = std::env::args()
        .nth(1)
        .map(ShmConfig::with_namespace)
        .unwrap_or_default();
    println!("[Poll] Namespace: {}", config.namespace);

    let consumers = match ActiveConsumers::open(&config, Arc::new(SystemClock)) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("[Poll] Failed to open consumer registry: {}", e);
            std::process::exit(1);
        }
    };
    let mut reader = match CachedReader::new(&config, consumers, ConsumerKind::Viewer, CpuBackend) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("[Poll] Failed to open segment: {}", e);
            std::process::exit(1);
        }
    };

    let mut last_key = None;
    let mut last_state = None;
    loop {
        let snapshot = reader.maybe_get_snapshot();
        let state = snapshot.state();
        if last_state != Some(state) {
            println!("[Poll] {:?}", state);
            last_state = Some(state);
        }

        if state == SnapshotState::Valid && last_key != Some(snapshot.render_cache_key()) {
            last_key = Some(snapshot.render_cache_key());
            let centre = snapshot.layer_texture(0).map(|t| {
                let size = t.pixel_size();
                let offset = ((size.height / 2 * size.width + size.width / 2) * 4) as usize;
                let pixels = t.texture().pixels();
                [pixels[offset], pixels[offset + 1], pixels[offset + 2]]
            });
            println!(
                "[Poll] seq {} | {} layer(s) | {} cached | centre {:?}",
                snapshot.sequence(),
                snapshot.layer_count(),
                reader.cache().len(),
                centre
            );
        }

        std::thread::sleep(Duration::from_millis(11));
    }
}
