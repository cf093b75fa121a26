use clap::Parser;
use colored::Colorize;
use kneeboard_shm::config::DEFAULT_NAMESPACE;
use kneeboard_shm::{ActiveConsumers, Reader, ShmConfig, SystemClock};
use shm_watch::{inspect, Report};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "shm-watch")]
#[command(about = "Inspect a kneeboard shared-memory namespace", long_about = None)]
struct Cli {
    /// Namespace prefix of the shared memory objects
    #[arg(short, long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,

    /// Output results in JSON format
    #[arg(short, long)]
    json: bool,

    /// Keep printing until interrupted
    #[arg(short, long)]
    follow: bool,

    /// Poll interval for --follow, in milliseconds
    #[arg(long, default_value_t = 500)]
    interval: u64,
}

fn main() {
    let args = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ShmConfig::with_namespace(args.namespace.clone());
    let clock = Arc::new(SystemClock);

    // Opening creates zeroed objects if nothing exists yet; that reads as
    // "no writer" below.
    let consumers = match ActiveConsumers::open(&config, clock.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            std::process::exit(1);
        }
    };
    let mut reader = match Reader::open(&config, clock) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            std::process::exit(1);
        }
    };

    let mut last_sequence = None;
    loop {
        let report = inspect(&config.namespace, &mut reader, &consumers);
        // In JSON follow mode only emit a line when something was published
        let unchanged = last_sequence == Some(report.header.sequence);
        last_sequence = Some(report.header.sequence);
        if !(args.follow && args.json && unchanged) {
            if args.json {
                match serde_json::to_string(&report) {
                    Ok(line) => println!("{}", line),
                    Err(e) => eprintln!("{} {}", "Error:".red(), e),
                }
            } else {
                print_report(&report);
            }
        }
        if !args.follow {
            break;
        }
        std::thread::sleep(Duration::from_millis(args.interval));
    }
}

fn yes_no(value: bool) -> colored::ColoredString {
    if value { "yes".green() } else { "no".red() }
}

fn print_report(report: &Report) {
    let header = &report.header;
    println!("\n{} {}", "Namespace:".bold(), report.namespace.blue());
    println!("{}", "--------------------------------------------------".dimmed());
    println!("{:<20} {}", "Segment", header.segment);
    println!("{:<20} {}", "Valid", yes_no(header.valid));
    println!("{:<20} {}", "Writer attached", yes_no(header.attached));
    if header.valid {
        println!("{:<20} {:016x}", "Session", header.session_id);
        println!("{:<20} {}", "Sequence", header.sequence);
        println!("{:<20} {}", "Feeder PID", header.feeder_pid);
        println!("{:<20} {}", "Flags", header.flags.join(" | "));
        match header.heartbeat_age_ms {
            Some(age) => println!("{:<20} {} ms ago", "Heartbeat", age),
            None => println!("{:<20} {}", "Heartbeat", "never".dimmed()),
        }
    }

    match &header.frame {
        Some(frame) => {
            println!(
                "\n{} target {:#x}, {} export(s) populated",
                "Frame:".bold(),
                frame.target_mask,
                frame.populated_exports
            );
            println!(
                "{:<12} | {:<11} | {:<7} | {:<5} | {:<10} | {}",
                "Layer", "Size", "Opacity", "Slot", "Export", "Handle"
            );
            println!("{}", "-".repeat(70));
            for layer in &frame.layers {
                let export = if layer.export_id == 0 {
                    "empty".yellow().to_string()
                } else {
                    layer.export_id.to_string()
                };
                println!(
                    "{:<12} | {:<11} | {:<7.2} | {:<5} | {:<10} | {:#x}",
                    layer.layer_id,
                    format!("{}x{}", layer.width, layer.height),
                    layer.opacity,
                    layer.export_slot,
                    export,
                    layer.handle
                );
            }
        }
        None if header.sequence > 0 => {
            println!("\n{}", "Frame: writer holds the lock, try again".yellow());
        }
        None => {}
    }

    let registry = &report.registry;
    println!("\n{} {}", "Consumers:".bold(), registry.name.dimmed());
    for consumer in &registry.consumers {
        let seen = match consumer.last_seen_ms_ago {
            Some(ms) => format!("{} ms ago", ms),
            None => "never".to_string(),
        };
        let marker = if consumer.active { "●".green() } else { "○".dimmed() };
        println!("  {} {:<14} {}", marker, consumer.kind, seen);
    }
    if registry.elevated_consumer_pid != 0 {
        println!("  elevated consumer pid {}", registry.elevated_consumer_pid);
    }
    println!(
        "  active view {} | non-VR size {}x{}",
        registry.active_view_id, registry.non_vr_width, registry.non_vr_height
    );
}
