use dsearch_domain::{
	category::{self, EntityCategory, FulltextGroup},
	language::{self, LanguagePreference, QueryLanguage},
	query,
};

#[test]
fn mixed_script_query_follows_arabic_share() {
	assert_eq!(language::detect_language("WTO اجتماع"), QueryLanguage::Ar);
	assert_eq!(language::detect_language("WTO ministerial meeting اجتماع"), QueryLanguage::En);
}

#[test]
fn languages_serialize_lowercase() {
	assert_eq!(serde_json::to_value(QueryLanguage::Ar).expect("serialize"), "ar");

	let preference: LanguagePreference =
		serde_json::from_value(serde_json::json!("auto")).expect("deserialize");

	assert_eq!(preference, LanguagePreference::Auto);
	assert!(serde_json::from_value::<LanguagePreference>(serde_json::json!("fr")).is_err());
}

#[test]
fn categories_serialize_as_identifiers() {
	let json = serde_json::to_value([EntityCategory::ExternalContacts, EntityCategory::Dossiers])
		.expect("serialize");

	assert_eq!(json, serde_json::json!(["external_contacts", "dossiers"]));
}

#[test]
fn resolved_categories_drive_fulltext_groups() {
	let requested = vec!["dossiers".to_string(), "persons".to_string(), "briefs".to_string()];
	let filters = vec!["theme".to_string(), "organization".to_string()];
	let resolution = category::resolve_categories(
		Some(requested.as_slice()),
		Some(filters.as_slice()),
		&EntityCategory::DEFAULT,
	)
	.expect("Request should resolve.");

	assert_eq!(
		resolution.categories,
		vec![
			EntityCategory::Theme,
			EntityCategory::Organization,
			EntityCategory::Persons,
			EntityCategory::Briefs,
		]
	);
	assert_eq!(
		category::fulltext_groups(&resolution.categories),
		vec![FulltextGroup::Dossiers, FulltextGroup::People]
	);
}

#[test]
fn normalized_query_keeps_inner_whitespace() {
	assert_eq!(query::normalize_query("  trade   policy "), Some("trade   policy"));
}
