pub mod search;

mod error;
mod rfc3339;

pub use error::{Error, Result};
pub use search::{
	EmbeddingInfo, MatchType, Performance, QueryEcho, SearchOptions, SearchRequest,
	SearchResponse, SearchResult,
};

use std::{future::Future, pin::Pin, sync::Arc};

use dsearch_config::{Config, EmbeddingProviderConfig};
use dsearch_providers::embedding;
use dsearch_storage::{
	db::Db,
	models::{FulltextRow, SemanticRow},
	queries::{self, FulltextQuery, SemanticQuery},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, Result<Vec<f32>>>;
}

/// The two search RPCs, each run under the caller's `Authorization` value.
pub trait SearchStore
where
	Self: Send + Sync,
{
	fn search_semantic<'a>(
		&'a self,
		authorization: Option<&'a str>,
		query: SemanticQuery<'a>,
	) -> BoxFuture<'a, Result<Vec<SemanticRow>>>;

	fn search_fulltext<'a>(
		&'a self,
		authorization: Option<&'a str>,
		query: FulltextQuery<'a>,
	) -> BoxFuture<'a, Result<Vec<FulltextRow>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
}
impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>) -> Self {
		Self { embedding }
	}
}
impl Default for Providers {
	fn default() -> Self {
		Self { embedding: Arc::new(DefaultProviders) }
	}
}

pub struct SearchService {
	pub cfg: Config,
	pub store: Arc<dyn SearchStore>,
	pub providers: Providers,
}
impl SearchService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, store: Arc::new(db), providers: Providers::default() }
	}

	pub fn with_parts(cfg: Config, store: Arc<dyn SearchStore>, providers: Providers) -> Self {
		Self { cfg, store, providers }
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, Result<Vec<f32>>> {
		Box::pin(async move { Ok(embedding::embed(cfg, text).await?) })
	}
}

impl SearchStore for Db {
	fn search_semantic<'a>(
		&'a self,
		authorization: Option<&'a str>,
		query: SemanticQuery<'a>,
	) -> BoxFuture<'a, Result<Vec<SemanticRow>>> {
		Box::pin(async move { Ok(queries::search_semantic(self, authorization, query).await?) })
	}

	fn search_fulltext<'a>(
		&'a self,
		authorization: Option<&'a str>,
		query: FulltextQuery<'a>,
	) -> BoxFuture<'a, Result<Vec<FulltextRow>>> {
		Box::pin(async move { Ok(queries::search_fulltext(self, authorization, query).await?) })
	}
}
