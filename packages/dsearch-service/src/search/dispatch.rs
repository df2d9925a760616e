use std::{fmt, future::Future, time::Duration};

use futures::future;

use dsearch_domain::{
	category::{EntityCategory, FulltextGroup},
	language::QueryLanguage,
};
use dsearch_storage::{
	models::{FulltextRow, SemanticRow},
	queries::{FulltextQuery, SemanticQuery},
};

use crate::{
	Error, Result, SearchStore,
	search::{MatchType, SearchResult},
};

/// Native full-text rank scale reported by the datastore.
pub const FULLTEXT_RANK_SCALE: f64 = 100.0;

/// Hits from one category or group, in datastore order, or why it contributed nothing.
pub type CategoryOutcome = std::result::Result<Vec<SearchResult>, CategoryFailure>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stream {
	Vector,
	Fulltext,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureReason {
	TimedOut,
	QueryFailed,
}

/// One category or group that contributed nothing. Rendered as a user-facing warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFailure {
	pub stream: Stream,
	pub source: &'static str,
	pub reason: FailureReason,
}
impl fmt::Display for CategoryFailure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let stream = match self.stream {
			Stream::Vector => "Vector search",
			Stream::Fulltext => "Full-text search",
		};

		match self.reason {
			FailureReason::TimedOut => write!(f, "{stream} timed out for {}.", self.source),
			FailureReason::QueryFailed => write!(f, "{stream} failed for {}.", self.source),
		}
	}
}

/// Shared parameters for every call in one fan-out.
#[derive(Clone, Copy, Debug)]
pub struct Fanout<'a> {
	pub authorization: Option<&'a str>,
	pub budget: u32,
	pub deadline: Duration,
}

/// `ceil(limit / category_count) + buffer`, with at least one category assumed.
pub fn category_budget(limit: u32, category_count: usize, buffer: u32) -> u32 {
	let count = u32::try_from(category_count.max(1)).unwrap_or(u32::MAX);

	limit.div_ceil(count).saturating_add(buffer)
}

/// One vector call per category, all in flight together. Output order follows `categories`.
pub async fn vector_search(
	store: &dyn SearchStore,
	fanout: Fanout<'_>,
	categories: &[EntityCategory],
	embedding: &[f32],
	similarity_threshold: f32,
) -> Vec<CategoryOutcome> {
	let calls = categories.iter().map(|category| {
		let source = category.as_str();
		let query = SemanticQuery {
			entity_type: source,
			embedding,
			similarity_threshold,
			limit: fanout.budget,
		};

		guarded(Stream::Vector, source, fanout.deadline, async move {
			let rows = store.search_semantic(fanout.authorization, query).await?;

			Ok::<_, Error>(rows.into_iter().map(semantic_result).collect::<Vec<_>>())
		})
	});

	future::join_all(calls).await
}

/// One keyword call per full-text group, all in flight together. Output order follows `groups`.
pub async fn fulltext_search(
	store: &dyn SearchStore,
	fanout: Fanout<'_>,
	groups: &[FulltextGroup],
	query: &str,
	language: QueryLanguage,
) -> Vec<CategoryOutcome> {
	let calls = groups.iter().map(|group| {
		let source = group.as_str();
		let query = FulltextQuery {
			entity_type: source,
			query,
			language: language.text_search_config(),
			limit: fanout.budget,
			offset: 0,
		};

		guarded(Stream::Fulltext, source, fanout.deadline, async move {
			let rows = store.search_fulltext(fanout.authorization, query).await?;

			Ok::<_, Error>(rows.into_iter().map(fulltext_result).collect::<Vec<_>>())
		})
	});

	future::join_all(calls).await
}

/// Splits completed outcomes into one flat candidate list and the failures, keeping order.
pub fn partition(outcomes: Vec<CategoryOutcome>) -> (Vec<SearchResult>, Vec<CategoryFailure>) {
	let mut results = Vec::new();
	let mut failures = Vec::new();

	for outcome in outcomes {
		match outcome {
			Ok(hits) => results.extend(hits),
			Err(failure) => failures.push(failure),
		}
	}

	(results, failures)
}

pub fn semantic_result(row: SemanticRow) -> SearchResult {
	SearchResult {
		entity_id: row.entity_id,
		entity_title: row.entity_title,
		entity_title_ar: row.entity_title_ar,
		description_en: row.description_en,
		description_ar: row.description_ar,
		similarity_score: unit_score(row.similarity_score),
		entity_type: row.entity_type,
		entity_subtype: row.entity_subtype,
		updated_at: row.updated_at,
		metadata: row.metadata,
		match_type: MatchType::Semantic,
		rank_position: 0,
	}
}

pub fn fulltext_result(row: FulltextRow) -> SearchResult {
	SearchResult {
		entity_id: row.entity_id,
		entity_title: row.entity_title_en,
		entity_title_ar: row.entity_title_ar,
		description_en: row.entity_snippet_en,
		description_ar: row.entity_snippet_ar,
		similarity_score: unit_score(row.rank_score / FULLTEXT_RANK_SCALE),
		entity_type: row.entity_type,
		entity_subtype: None,
		updated_at: row.updated_at,
		metadata: None,
		match_type: MatchType::Fulltext,
		rank_position: 0,
	}
}

/// Clamps into [0, 1]; non-finite scores count as no similarity.
fn unit_score(score: f64) -> f32 {
	if !score.is_finite() {
		return 0.0;
	}

	score.clamp(0.0, 1.0) as f32
}

async fn guarded<F>(
	stream: Stream,
	source: &'static str,
	deadline: Duration,
	call: F,
) -> CategoryOutcome
where
	F: Future<Output = Result<Vec<SearchResult>>>,
{
	let reason = match tokio::time::timeout(deadline, call).await {
		Ok(Ok(results)) => return Ok(results),
		Ok(Err(err)) => {
			tracing::warn!(error = %err, ?stream, source, "Category search failed.");

			FailureReason::QueryFailed
		},
		Err(_) => {
			tracing::warn!(
				?stream,
				source,
				deadline_ms = deadline.as_millis() as u64,
				"Category search timed out."
			);

			FailureReason::TimedOut
		},
	};

	Err(CategoryFailure { stream, source, reason })
}
