use serde_json::Value;
use time::OffsetDateTime;

/// One row of `search_entities_semantic`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SemanticRow {
	pub entity_id: String,
	pub entity_title: String,
	pub entity_title_ar: Option<String>,
	pub description_en: Option<String>,
	pub description_ar: Option<String>,
	pub similarity_score: f64,
	pub entity_type: String,
	pub entity_subtype: Option<String>,
	pub updated_at: OffsetDateTime,
	pub metadata: Option<Value>,
}

/// One row of `search_entities_fulltext`. `rank_score` is on the datastore's 0-100 scale.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FulltextRow {
	pub entity_id: String,
	pub entity_title_en: String,
	pub entity_title_ar: Option<String>,
	pub entity_snippet_en: Option<String>,
	pub entity_snippet_ar: Option<String>,
	pub rank_score: f64,
	pub entity_type: String,
	pub updated_at: OffsetDateTime,
}
