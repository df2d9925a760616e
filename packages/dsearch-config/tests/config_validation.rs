use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::{Table, Value};

use dsearch_config::{Config, Error};
use dsearch_domain::category::EntityCategory;

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn sample_table() -> Table {
	toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.")
}

fn section<'a>(root: &'a mut Table, path: &[&str]) -> &'a mut Table {
	let mut table = root;

	for key in path {
		table = table
			.get_mut(*key)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Sample config must include [{key}]."));
	}

	table
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("dsearch_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_table(table: &Table) -> dsearch_config::Result<Config> {
	let payload = toml::to_string(table).expect("Failed to render config.");
	let path = write_temp_config(payload);
	let result = dsearch_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse test config.")
}

#[test]
fn sample_config_loads_and_normalizes() {
	let cfg = load_table(&sample_table()).expect("Sample config should load.");

	assert_eq!(cfg.providers.embedding.api_base, "http://127.0.0.1:3001");
	assert_eq!(cfg.providers.embedding.api_key, None);
	assert_eq!(cfg.providers.embedding.dimensions, 1_536);
	assert_eq!(cfg.storage.postgres.query_timeout_ms, 5_000);
	assert_eq!(cfg.search.default_entity_types, EntityCategory::DEFAULT.to_vec());
}

#[test]
fn search_section_is_optional() {
	let mut table = sample_table();

	table.remove("search");
	table.remove("security");

	let cfg = load_table(&table).expect("Config without [search] should load.");

	assert_eq!(cfg.search.limit, 50);
	assert_eq!(cfg.search.max_limit, 100);
	assert_eq!(cfg.search.category_buffer, 5);
	assert!((cfg.search.similarity_threshold - 0.6).abs() < f32::EPSILON);
	assert!(cfg.security.bind_localhost_only);
}

#[test]
fn unknown_default_entity_type_fails_to_parse() {
	let mut table = sample_table();

	section(&mut table, &["search"]).insert(
		"default_entity_types".to_string(),
		Value::Array(vec![Value::String("invoices".to_string())]),
	);

	let err = load_table(&table).expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }), "Unexpected error: {err}");
}

#[test]
fn missing_file_reports_path() {
	let path = env::temp_dir().join("dsearch_config_test_missing.toml");
	let err = dsearch_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }));
	assert!(err.to_string().contains("dsearch_config_test_missing.toml"));
}

#[test]
fn threshold_must_be_in_unit_range() {
	let mut cfg = base_config();

	cfg.search.similarity_threshold = 1.5;

	let err = dsearch_config::validate(&cfg).expect_err("Expected threshold validation error.");

	assert!(
		err.to_string().contains("search.similarity_threshold must be in the range 0.0-1.0."),
		"Unexpected error: {err}"
	);

	cfg.search.similarity_threshold = f32::NAN;

	let err = dsearch_config::validate(&cfg).expect_err("Expected finite validation error.");

	assert!(err.to_string().contains("must be a finite number."), "Unexpected error: {err}");
}

#[test]
fn limit_must_fit_under_max_limit() {
	let mut cfg = base_config();

	cfg.search.limit = 80;
	cfg.search.max_limit = 60;

	let err = dsearch_config::validate(&cfg).expect_err("Expected limit validation error.");

	assert!(err.to_string().contains("search.limit"), "Unexpected error: {err}");

	cfg = base_config();
	cfg.search.max_limit = 500;

	let err = dsearch_config::validate(&cfg).expect_err("Expected max_limit validation error.");

	assert!(
		err.to_string().contains("search.max_limit must be in the range 1-100."),
		"Unexpected error: {err}"
	);
}

#[test]
fn default_entity_types_must_be_non_empty() {
	let mut cfg = base_config();

	cfg.search.default_entity_types.clear();

	let err = dsearch_config::validate(&cfg).expect_err("Expected entity type validation error.");

	assert!(
		err.to_string().contains("search.default_entity_types must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn embedding_dimensions_must_be_positive() {
	let mut cfg = base_config();

	cfg.providers.embedding.dimensions = 0;

	let err = dsearch_config::validate(&cfg).expect_err("Expected dimensions validation error.");

	assert!(
		err.to_string().contains("providers.embedding.dimensions must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn query_timeout_must_be_positive() {
	let mut cfg = base_config();

	cfg.storage.postgres.query_timeout_ms = 0;

	assert!(dsearch_config::validate(&cfg).is_err());
}

#[test]
fn disabled_embedding_provider_skips_path_check() {
	let mut cfg = base_config();

	cfg.providers.embedding.api_base = String::new();
	cfg.providers.embedding.path = "embed".to_string();

	assert!(dsearch_config::validate(&cfg).is_ok());

	cfg.providers.embedding.api_base = "http://127.0.0.1:3001".to_string();

	assert!(dsearch_config::validate(&cfg).is_err());
}

#[test]
fn default_header_values_must_be_strings() {
	let mut cfg = base_config();

	cfg.providers.embedding.default_headers.insert("x-retries".to_string(), serde_json::json!(3));

	let err = dsearch_config::validate(&cfg).expect_err("Expected header validation error.");

	assert!(err.to_string().contains("default_headers"), "Unexpected error: {err}");
}
