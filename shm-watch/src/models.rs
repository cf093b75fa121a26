use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerReport {
    pub layer_id: u64,
    pub width: u32,
    pub height: u32,
    pub opacity: f32,
    pub export_slot: u32,
    /// Zero if the layer points at an empty slot
    pub export_id: u64,
    pub handle: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameReport {
    pub sequence: u64,
    pub target_mask: u32,
    pub global_input_layer_id: u64,
    pub layers: Vec<LayerReport>,
    pub populated_exports: usize,
    /// Value the consumer waits for before sampling, if the frame is fenced
    pub fence_value: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderReport {
    pub segment: String,
    pub valid: bool,
    pub attached: bool,
    pub session_id: u64,
    pub sequence: u64,
    pub feeder_pid: u32,
    pub flags: Vec<String>,
    /// Milliseconds since the writer last touched the header
    pub heartbeat_age_ms: Option<u64>,
    /// `None` when the writer held the lock at the time of the copy
    pub frame: Option<FrameReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerReport {
    pub kind: String,
    pub active: bool,
    pub last_seen_ms_ago: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryReport {
    pub name: String,
    pub consumers: Vec<ConsumerReport>,
    pub elevated_consumer_pid: u32,
    pub active_view_id: u64,
    pub non_vr_width: u32,
    pub non_vr_height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub namespace: String,
    pub header: HeaderReport,
    pub registry: RegistryReport,
}
