//! Wall-clock timing of report sections

use std::time::Instant;

/// Logs how long a section took when dropped
pub struct SectionTimer {
    name: &'static str,
    start: Instant,
}

impl SectionTimer {
    pub fn start(name: &'static str) -> Self {
        log::debug!("{}: started", name);
        Self {
            name,
            start: Instant::now(),
        }
    }
}

impl Drop for SectionTimer {
    fn drop(&mut self) {
        log::info!("{}: {:.3}s", self.name, self.start.elapsed().as_secs_f64());
    }
}
