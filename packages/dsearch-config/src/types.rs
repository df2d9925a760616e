use serde::Deserialize;
use serde_json::{Map, Value};

use dsearch_domain::category::EntityCategory;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
	/// Deadline for a single per-category RPC.
	#[serde(default = "default_query_timeout_ms")]
	pub query_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	/// Empty disables the provider; searches then fall back to full-text only.
	pub api_base: String,
	pub api_key: Option<String>,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub default_entity_types: Vec<EntityCategory>,
	pub similarity_threshold: f32,
	pub limit: u32,
	pub max_limit: u32,
	/// Extra candidates fetched per category on top of the even split of `limit`.
	pub category_buffer: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			default_entity_types: EntityCategory::DEFAULT.to_vec(),
			similarity_threshold: 0.6,
			limit: 50,
			max_limit: 100,
			category_buffer: 5,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Security {
	pub bind_localhost_only: bool,
}
impl Default for Security {
	fn default() -> Self {
		Self { bind_localhost_only: true }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_query_timeout_ms() -> u64 {
	5_000
}
