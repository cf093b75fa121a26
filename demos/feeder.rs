//! Example feeder (writer)
//!
//! Publishes one animated layer into a namespace so `poll` or `shm-watch`
//! has something to look at.
//!
//! ```text
//! RUST_LOG=kneeboard_shm=debug cargo run --example feeder -- my-namespace 600
//! ```

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn main() {
    eprintln!("the feeder demo renders into memfd textures and needs Linux");
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn main() {
    use kneeboard_shm::texture::cpu::MemfdTexture;
    use kneeboard_shm::{
        ActiveConsumers, FrameConfig, HeaderFlags, LayerSubmission, PhysicalSize, PixelSize, Pose,
        ShmConfig, SystemClock, Writer, SWAPCHAIN_LENGTH,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let config = args
        .next()
        .map(ShmConfig::with_namespace)
        .unwrap_or_default();
    let frames: u64 = args.next().and_then(|n| n.parse().ok()).unwrap_or(300);

    println!("[Feeder] Namespace: {}", config.namespace);

    let consumers = match ActiveConsumers::open(&config, Arc::new(SystemClock)) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("[Feeder] Failed to open consumer registry: {}", e);
            std::process::exit(1);
        }
    };
    let mut writer = match Writer::create(&config, consumers) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("[Feeder] Failed to attach: {}", e);
            std::process::exit(1);
        }
    };
    println!("[Feeder] Session {:016x}", writer.session_id());

    let size = PixelSize::new(512, 512);
    let mut pages = Vec::with_capacity(SWAPCHAIN_LENGTH);
    for _ in 0..SWAPCHAIN_LENGTH {
        match MemfdTexture::new(size) {
            Ok(page) => pages.push(page),
            Err(e) => {
                eprintln!("[Feeder] Failed to allocate texture: {}", e);
                std::process::exit(1);
            }
        }
    }

    let frame_config = FrameConfig::default();
    let mut published = 0u64;
    while published < frames {
        if !writer.try_lock() {
            writer.keep_alive();
            std::thread::sleep(Duration::from_millis(1));
            continue;
        }

        let next = writer.begin_frame();
        let page = &mut pages[next.swapchain_index];
        let shade = (next.sequence % 256) as u8;
        page.fill([shade, 255 - shade, 0x80, 0xff]);

        let mut layer = LayerSubmission::new(1, &*page);
        layer.pose = Pose {
            position: [0.15, -0.25, -0.4],
            ..Pose::default()
        };
        layer.physical_size = PhysicalSize {
            width: 0.25,
            height: 0.25,
        };
        let result = writer.submit_frame(&frame_config, HeaderFlags::empty(), &[layer]);
        writer.unlock();

        match result {
            Ok(seq) => {
                published += 1;
                if seq % 60 == 0 {
                    let active = writer.active_consumers();
                    println!(
                        "[Feeder] seq {} | vr {} | non-vr {}",
                        seq,
                        active.any_vr().is_some(),
                        active.not_vr().is_some()
                    );
                }
            }
            Err(e) => eprintln!("[Feeder] Frame rejected: {}", e),
        }
        std::thread::sleep(Duration::from_millis(16));
    }

    writer.detach();
    println!("[Feeder] Detached after {} frames", writer.frame_count());
}
