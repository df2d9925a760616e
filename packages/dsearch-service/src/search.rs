pub mod blend;
pub mod dispatch;

mod report;

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use tokio::time as tokio_time;

use dsearch_domain::{
	category::{self, CategoryRejectReason, EntityCategory},
	language::{self, LanguagePreference, QueryLanguage},
	query,
};
use dsearch_providers::embedding::normalize_dimensions;

use crate::{
	Error, Result, SearchService,
	search::{
		dispatch::{CategoryOutcome, Fanout},
		report::Report,
	},
};

pub const EMBEDDING_FALLBACK_WARNING: &str =
	"Embedding generation failed. Falling back to full-text search only.";

/// Wire form of a search call. Everything except `query` is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
	#[serde(default)]
	pub query: String,
	pub entity_types: Option<Vec<String>>,
	pub similarity_threshold: Option<f64>,
	/// Any JSON number; clamped and floored when options are built.
	pub limit: Option<f64>,
	pub include_fulltext: Option<bool>,
	pub language: Option<LanguagePreference>,
	pub dossier_types: Option<Vec<String>>,
	pub include_metadata: Option<bool>,
}

/// A request with every default applied and every bound enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
	pub query: String,
	pub language: QueryLanguage,
	pub categories: Vec<EntityCategory>,
	pub similarity_threshold: f32,
	pub limit: u32,
	pub include_fulltext: bool,
	pub include_metadata: bool,
	/// Requested identifiers that matched no known category.
	pub ignored_entity_types: Vec<String>,
}
impl SearchOptions {
	pub fn from_request(req: &SearchRequest, defaults: &dsearch_config::Search) -> Result<Self> {
		let query = query::normalize_query(&req.query).ok_or(Error::EmptyQuery)?;
		let resolution = category::resolve_categories(
			req.entity_types.as_deref(),
			req.dossier_types.as_deref(),
			&defaults.default_entity_types,
		)
		.map_err(|reason| match reason {
			CategoryRejectReason::NoValidCategories =>
				Error::InvalidEntityTypes { valid: category::valid_category_list() },
		})?;
		let similarity_threshold = req
			.similarity_threshold
			.map(|value| value.clamp(0.0, 1.0) as f32)
			.unwrap_or(defaults.similarity_threshold);
		let max_limit = defaults.max_limit.clamp(1, dsearch_config::MAX_RESULT_LIMIT);
		let limit = match req.limit.filter(|value| value.is_finite()) {
			Some(value) => value.clamp(1.0, f64::from(max_limit)).floor() as u32,
			None => defaults.limit.clamp(1, max_limit),
		};

		Ok(Self {
			query: query.to_string(),
			language: language::resolve_language(query, req.language.unwrap_or_default()),
			categories: resolution.categories,
			similarity_threshold,
			limit,
			include_fulltext: req.include_fulltext.unwrap_or(false),
			include_metadata: req.include_metadata.unwrap_or(false),
			ignored_entity_types: resolution.unknown,
		})
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
	Semantic,
	Fulltext,
	Hybrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
	pub entity_id: String,
	pub entity_title: String,
	pub entity_title_ar: Option<String>,
	pub description_en: Option<String>,
	pub description_ar: Option<String>,
	pub similarity_score: f32,
	pub entity_type: String,
	pub entity_subtype: Option<String>,
	#[serde(with = "crate::rfc3339")]
	pub updated_at: OffsetDateTime,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub metadata: Option<Value>,
	pub match_type: MatchType,
	pub rank_position: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryEcho {
	pub original: String,
	pub detected_language: QueryLanguage,
	pub entity_types: Vec<EntityCategory>,
	pub similarity_threshold: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performance {
	pub embedding_ms: u64,
	pub vector_search_ms: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fulltext_search_ms: Option<u64>,
	pub total_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingInfo {
	pub model: String,
	pub dimensions: u32,
	pub generated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
	pub data: Vec<SearchResult>,
	pub count: usize,
	pub query: QueryEcho,
	pub performance: Performance,
	pub embedding_info: EmbeddingInfo,
	pub warnings: Vec<String>,
}

impl SearchService {
	/// Runs one unified search. Only invalid input is an error; every degraded dependency
	/// becomes a warning on an otherwise successful response.
	pub async fn search(
		&self,
		req: SearchRequest,
		authorization: Option<&str>,
	) -> Result<SearchResponse> {
		let mut report = Report::start();
		let opts = SearchOptions::from_request(&req, &self.cfg.search)?;

		for ignored in &opts.ignored_entity_types {
			report.warn(format!("Ignored unknown entity type: {ignored}."));
		}

		let embedding_started = Instant::now();
		let embedding = self.embed_query(&opts.query).await;

		report.record_embedding(embedding_started.elapsed());

		if embedding.is_none() {
			report.warn(EMBEDDING_FALLBACK_WARNING);
		}

		let run_fulltext = opts.include_fulltext || embedding.is_none();
		let groups =
			if run_fulltext { category::fulltext_groups(&opts.categories) } else { Vec::new() };
		let fanout = Fanout {
			authorization,
			budget: dispatch::category_budget(
				opts.limit,
				opts.categories.len(),
				self.cfg.search.category_buffer,
			),
			deadline: Duration::from_millis(self.cfg.storage.postgres.query_timeout_ms),
		};
		let store = self.store.as_ref();
		let vector_stream = async {
			let embedding = embedding.as_deref()?;
			let started = Instant::now();
			let outcomes = dispatch::vector_search(
				store,
				fanout,
				&opts.categories,
				embedding,
				opts.similarity_threshold,
			)
			.await;

			Some((outcomes, started.elapsed()))
		};
		let fulltext_stream = async {
			if !run_fulltext {
				return None;
			}

			let started = Instant::now();
			let outcomes =
				dispatch::fulltext_search(store, fanout, &groups, &opts.query, opts.language).await;

			Some((outcomes, started.elapsed()))
		};
		let (vector_outcomes, fulltext_outcomes) = tokio::join!(vector_stream, fulltext_stream);
		let semantic = collect_stream(&mut report, vector_outcomes, Report::record_vector_search);
		let fulltext =
			collect_stream(&mut report, fulltext_outcomes, Report::record_fulltext_search);
		let mut data = blend::blend(semantic, fulltext, opts.limit as usize);

		if !opts.include_metadata {
			for result in &mut data {
				result.metadata = None;
			}
		}

		let (performance, warnings) = report.finish();

		tracing::debug!(
			count = data.len(),
			language = opts.language.as_str(),
			categories = opts.categories.len(),
			embedding_ms = performance.embedding_ms,
			vector_search_ms = performance.vector_search_ms,
			fulltext_search_ms = performance.fulltext_search_ms,
			total_ms = performance.total_ms,
			warnings = warnings.len(),
			"Unified search completed."
		);

		Ok(SearchResponse {
			count: data.len(),
			data,
			query: QueryEcho {
				original: opts.query,
				detected_language: opts.language,
				entity_types: opts.categories,
				similarity_threshold: opts.similarity_threshold,
			},
			performance,
			embedding_info: EmbeddingInfo {
				model: self.cfg.providers.embedding.model.clone(),
				dimensions: self.cfg.providers.embedding.dimensions,
				generated: embedding.is_some(),
			},
			warnings,
		})
	}

	/// Returns `None` whenever the provider cannot produce a usable vector.
	async fn embed_query(&self, query: &str) -> Option<Vec<f32>> {
		let cfg = &self.cfg.providers.embedding;
		let deadline = Duration::from_millis(cfg.timeout_ms);

		match tokio_time::timeout(deadline, self.providers.embedding.embed(cfg, query)).await {
			Ok(Ok(vector)) if !vector.is_empty() =>
				Some(normalize_dimensions(vector, cfg.dimensions as usize)),
			Ok(Ok(_)) => {
				tracing::warn!(provider_id = %cfg.provider_id, "Embedding provider returned no values.");

				None
			},
			Ok(Err(err)) => {
				tracing::warn!(
					error = %err,
					provider_id = %cfg.provider_id,
					"Embedding generation failed."
				);

				None
			},
			Err(_) => {
				tracing::warn!(
					provider_id = %cfg.provider_id,
					timeout_ms = cfg.timeout_ms,
					"Embedding generation timed out."
				);

				None
			},
		}
	}
}

fn collect_stream(
	report: &mut Report,
	stream: Option<(Vec<CategoryOutcome>, Duration)>,
	record: fn(&mut Report, Duration),
) -> Vec<SearchResult> {
	let Some((outcomes, elapsed)) = stream else {
		return Vec::new();
	};

	record(report, elapsed);

	let (results, failures) = dispatch::partition(outcomes);

	for failure in failures {
		report.warn(failure.to_string());
	}

	results
}
