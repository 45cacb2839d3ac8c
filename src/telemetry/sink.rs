use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use log::trace;

use super::{TelemetrySink, TelemetryValue};

// Forwards every record to the `log` facade
#[derive(Debug, Default)]
pub struct LogSink;

impl TelemetrySink for LogSink {
    fn record(&mut self, key: &str, value: TelemetryValue) {
        match &value {
            TelemetryValue::Text(text) => trace!("{} = {}", key, text),
            TelemetryValue::Number(number) => trace!("{} = {:.3}", key, number),
            TelemetryValue::Pose(pose) => trace!("{} = {:?}", key, pose.translation.vector),
            TelemetryValue::Poses(poses) => trace!("{} = {} poses", key, poses.len()),
        }
    }
}

/// Keeps the latest value per key.
///
/// Clones share the same table, so one handle can be given to the coordinator
/// while another is read by the caller.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    table: Arc<Mutex<BTreeMap<String, TelemetryValue>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        MemorySink::default()
    }

    fn table(&self) -> MutexGuard<'_, BTreeMap<String, TelemetryValue>> {
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Latest value recorded under `key`
    pub fn get(&self, key: &str) -> Option<TelemetryValue> {
        self.table().get(key).cloned()
    }

    /// Copy of every key and its latest value
    pub fn snapshot(&self) -> BTreeMap<String, TelemetryValue> {
        self.table().clone()
    }

    /// Serializes the current table for logs or offline inspection
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&*self.table())
    }
}

impl TelemetrySink for MemorySink {
    fn record(&mut self, key: &str, value: TelemetryValue) {
        self.table().insert(key.to_string(), value);
    }
}

/// Sends each record to several sinks in order
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn TelemetrySink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        FanoutSink::default()
    }

    pub fn with(mut self, sink: impl TelemetrySink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }
}

impl TelemetrySink for FanoutSink {
    fn record(&mut self, key: &str, value: TelemetryValue) {
        for sink in &mut self.sinks {
            sink.record(key, value.clone());
        }
    }
}
