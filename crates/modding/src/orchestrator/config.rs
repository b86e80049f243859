//! Orchestrator configuration.

/// Behavior switches for [`LoadOrchestrator`](super::LoadOrchestrator).
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Run a full reload after every `enable`/`move_package`.
    pub auto_reload: bool,
    /// Capacity of the error channel.
    pub error_buffer: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            auto_reload: false,
            error_buffer: 64,
        }
    }
}
