use crate::models::{ConsumerReport, FrameReport, HeaderReport, LayerReport, RegistryReport, Report};
use kneeboard_shm::layout::segment_name;
use kneeboard_shm::snapshot::FrameCopy;
use kneeboard_shm::{ActiveConsumers, Clock, ConsumerKind, ConsumerTimes, HeaderFlags, Reader};
use std::time::Duration;

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

pub fn flag_names(flags: HeaderFlags) -> Vec<String> {
    flags.iter_names().map(|(name, _)| name.to_string()).collect()
}

pub fn frame_report(copy: &FrameCopy) -> FrameReport {
    let metadata = &copy.metadata;
    let layers = metadata
        .layers()
        .iter()
        .map(|layer| {
            let export = metadata.export_for(layer);
            LayerReport {
                layer_id: layer.layer_id,
                width: layer.pixel_size.width,
                height: layer.pixel_size.height,
                opacity: layer.opacity,
                export_slot: layer.export_slot,
                export_id: export.map_or(0, |e| e.export_id),
                handle: export.map_or(0, |e| e.handle),
            }
        })
        .collect();
    FrameReport {
        sequence: copy.sequence,
        target_mask: metadata.config.target.bits(),
        global_input_layer_id: metadata.config.global_input_layer_id,
        layers,
        populated_exports: metadata.exports.iter().filter(|e| !e.is_empty()).count(),
        fence_value: metadata.fence().map(|f| f.value),
    }
}

/// Reads the header fields without the lock, then tries one locked copy
/// of the frame. Never stamps the consumer registry.
pub fn header_report(namespace: &str, reader: &mut Reader, now: Duration) -> HeaderReport {
    let (valid, flags, feeder_pid, heartbeat) = {
        let header = reader.header();
        (
            header.validate().is_ok(),
            header.flags(),
            header.feeder_pid(),
            header.heartbeat(),
        )
    };
    let (session_id, sequence) = reader.peek();
    let attached = reader.is_attached();
    let frame = if valid && sequence > 0 {
        reader.try_copy().map(|copy| frame_report(&copy))
    } else {
        None
    };

    HeaderReport {
        segment: segment_name(namespace),
        valid,
        attached,
        session_id,
        sequence,
        feeder_pid,
        flags: flag_names(flags),
        heartbeat_age_ms: (!heartbeat.is_zero()).then(|| millis(now.saturating_sub(heartbeat))),
        frame,
    }
}

pub fn registry_report(name: &str, times: &ConsumerTimes) -> RegistryReport {
    let consumers = ConsumerKind::ALL
        .iter()
        .map(|&kind| ConsumerReport {
            kind: format!("{:?}", kind),
            active: times.is_active(kind),
            last_seen_ms_ago: times
                .last_seen(kind)
                .map(|seen| millis(times.now.saturating_sub(seen))),
        })
        .collect();
    RegistryReport {
        name: name.to_string(),
        consumers,
        elevated_consumer_pid: times.elevated_consumer_pid,
        active_view_id: times.active_view_id,
        non_vr_width: times.non_vr_pixel_size.width,
        non_vr_height: times.non_vr_pixel_size.height,
    }
}

pub fn inspect(namespace: &str, reader: &mut Reader, consumers: &ActiveConsumers) -> Report {
    let now = consumers.clock().now();
    Report {
        namespace: namespace.to_string(),
        header: header_report(namespace, reader, now),
        registry: registry_report(consumers.name(), &consumers.get()),
    }
}
