use std::time::{Duration, Instant};

use crate::search::Performance;

/// Collects phase timings and non-fatal warnings for one request.
pub(crate) struct Report {
	started: Instant,
	performance: Performance,
	warnings: Vec<String>,
}
impl Report {
	pub(crate) fn start() -> Self {
		Self { started: Instant::now(), performance: Performance::default(), warnings: Vec::new() }
	}

	pub(crate) fn warn(&mut self, message: impl Into<String>) {
		self.warnings.push(message.into());
	}

	pub(crate) fn record_embedding(&mut self, elapsed: Duration) {
		self.performance.embedding_ms = millis(elapsed);
	}

	pub(crate) fn record_vector_search(&mut self, elapsed: Duration) {
		self.performance.vector_search_ms = millis(elapsed);
	}

	pub(crate) fn record_fulltext_search(&mut self, elapsed: Duration) {
		self.performance.fulltext_search_ms = Some(millis(elapsed));
	}

	pub(crate) fn finish(mut self) -> (Performance, Vec<String>) {
		self.performance.total_ms = millis(self.started.elapsed());

		(self.performance, self.warnings)
	}
}

fn millis(elapsed: Duration) -> u64 {
	u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
