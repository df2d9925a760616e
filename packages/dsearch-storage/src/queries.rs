use sqlx::{Postgres, Transaction};

use crate::{
	Error, Result,
	db::Db,
	models::{FulltextRow, SemanticRow},
};

#[derive(Debug, Clone, Copy)]
pub struct SemanticQuery<'a> {
	pub entity_type: &'a str,
	pub embedding: &'a [f32],
	pub similarity_threshold: f32,
	pub limit: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct FulltextQuery<'a> {
	pub entity_type: &'a str,
	pub query: &'a str,
	/// Text search configuration, e.g. `english` or `arabic`.
	pub language: &'a str,
	pub limit: u32,
	pub offset: u32,
}

/// Runs `search_entities_semantic` under the caller's authorization context.
pub async fn search_semantic(
	db: &Db,
	authorization: Option<&str>,
	query: SemanticQuery<'_>,
) -> Result<Vec<SemanticRow>> {
	if query.embedding.is_empty() {
		return Err(Error::InvalidArgument("Query embedding must be non-empty.".to_string()));
	}

	let embedding = vector_literal(query.embedding);
	let mut tx = db.pool.begin().await?;

	apply_request_context(&mut tx, authorization).await?;

	let rows = sqlx::query_as::<_, SemanticRow>(
		"\
SELECT
	entity_id::text AS entity_id,
	entity_title,
	entity_title_ar,
	description_en,
	description_ar,
	similarity_score::float8 AS similarity_score,
	entity_type,
	entity_subtype,
	updated_at,
	metadata
FROM search_entities_semantic($1, $2::text::vector, $3, $4)",
	)
	.bind(query.entity_type)
	.bind(embedding.as_str())
	.bind(f64::from(query.similarity_threshold))
	.bind(to_i32(query.limit))
	.fetch_all(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(rows)
}

/// Runs `search_entities_fulltext` under the caller's authorization context.
pub async fn search_fulltext(
	db: &Db,
	authorization: Option<&str>,
	query: FulltextQuery<'_>,
) -> Result<Vec<FulltextRow>> {
	let mut tx = db.pool.begin().await?;

	apply_request_context(&mut tx, authorization).await?;

	let rows = sqlx::query_as::<_, FulltextRow>(
		"\
SELECT
	entity_id::text AS entity_id,
	entity_title_en,
	entity_title_ar,
	entity_snippet_en,
	entity_snippet_ar,
	rank_score::float8 AS rank_score,
	entity_type,
	updated_at
FROM search_entities_fulltext($1, $2, $3, $4, $5)",
	)
	.bind(query.entity_type)
	.bind(query.query)
	.bind(query.language)
	.bind(to_i32(query.limit))
	.bind(to_i32(query.offset))
	.fetch_all(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(rows)
}

/// Exposes the caller's Authorization header to row-level security policies the same way
/// PostgREST does, scoped to the current transaction.
async fn apply_request_context(
	tx: &mut Transaction<'_, Postgres>,
	authorization: Option<&str>,
) -> Result<()> {
	let Some(authorization) = authorization else {
		return Ok(());
	};
	let headers = serde_json::json!({ "authorization": authorization }).to_string();

	sqlx::query("SELECT set_config('request.headers', $1, true)")
		.bind(headers)
		.execute(&mut **tx)
		.await?;

	Ok(())
}

pub fn vector_literal(vec: &[f32]) -> String {
	let mut out = String::with_capacity(vec.len() * 8);

	out.push('[');

	for (i, value) in vec.iter().enumerate() {
		if i > 0 {
			out.push(',');
		}

		out.push_str(&value.to_string());
	}

	out.push(']');

	out
}

fn to_i32(value: u32) -> i32 {
	i32::try_from(value).unwrap_or(i32::MAX)
}
