use dsearch_config::Postgres;
use dsearch_storage::{
	db::Db,
	queries::{self, FulltextQuery, SemanticQuery},
};
use dsearch_testkit::TestDatabase;

const SEARCH_RPC_SQL: &str = include_str!("fixtures/search_rpc.sql");

async fn fixture_db() -> Option<(TestDatabase, Db)> {
	let Some(base_dsn) = dsearch_testkit::env_dsn() else {
		eprintln!("Skipping storage tests; set DSEARCH_PG_DSN to run this test.");

		return None;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");

	test_db.execute_script(SEARCH_RPC_SQL).await.expect("Failed to load search fixture.");

	let cfg =
		Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 2, query_timeout_ms: 5_000 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to test database.");

	Some((test_db, db))
}

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set DSEARCH_PG_DSN to run."]
async fn semantic_rpc_filters_by_threshold_and_authorization() {
	let Some((test_db, db)) = fixture_db().await else {
		return;
	};
	let embedding = [1.0_f32, 0.0, 0.0];
	let query = SemanticQuery {
		entity_type: "positions",
		embedding: &embedding,
		similarity_threshold: 0.5,
		limit: 10,
	};
	let anonymous =
		queries::search_semantic(&db, None, query).await.expect("Semantic search failed.");

	assert_eq!(anonymous.len(), 1);
	assert_eq!(anonymous[0].entity_id, "00000000-0000-0000-0000-000000000001");
	assert!((anonymous[0].similarity_score - 1.0).abs() < 1e-6);

	let owner = queries::search_semantic(&db, Some("Bearer alice"), query)
		.await
		.expect("Semantic search failed.");

	assert_eq!(owner.len(), 2);

	let dossiers = SemanticQuery { entity_type: "dossiers", ..query };
	let rows = queries::search_semantic(&db, None, dossiers).await.expect("Semantic search failed.");

	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].entity_subtype.as_deref(), Some("country"));
	assert!(rows[0].metadata.is_some());

	db.pool.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set DSEARCH_PG_DSN to run."]
async fn fulltext_rpc_ranks_matches_per_group() {
	let Some((test_db, db)) = fixture_db().await else {
		return;
	};
	let query = FulltextQuery {
		entity_type: "positions",
		query: "trade policy",
		language: "english",
		limit: 10,
		offset: 0,
	};
	let rows = queries::search_fulltext(&db, None, query).await.expect("Full-text search failed.");

	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].entity_title_en, "Trade policy position");
	assert!(rows[0].rank_score > 0.0);

	let people = FulltextQuery { entity_type: "people", ..query };
	let rows = queries::search_fulltext(&db, None, people).await.expect("Full-text search failed.");

	assert!(rows.is_empty());

	db.pool.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set DSEARCH_PG_DSN to run."]
async fn empty_embedding_is_rejected_before_the_datastore() {
	let Some((test_db, db)) = fixture_db().await else {
		return;
	};
	let query =
		SemanticQuery { entity_type: "positions", embedding: &[], similarity_threshold: 0.5, limit: 5 };
	let err = queries::search_semantic(&db, None, query).await.expect_err("Expected rejection.");

	assert!(matches!(err, dsearch_storage::Error::InvalidArgument(_)));

	db.pool.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
