use log::{debug, info};

/// Thin wrapper over the `log` facade tagged with the owning component.
pub struct LogManager {
    component: &'static str,
}

impl LogManager {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.component, message);
    }

    /// Per-frame chatter that should stay quiet unless `RUST_LOG=debug`.
    pub fn trace(&self, message: &str) {
        debug!("[{}] {}", self.component, message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("fmcwcore")
    }
}
