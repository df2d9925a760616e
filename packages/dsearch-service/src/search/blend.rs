use std::collections::HashMap;

use crate::search::{MatchType, SearchResult};

/// Multiplier applied once to an entity found by both vector and keyword search.
pub const HYBRID_BOOST: f32 = 1.1;

/// Fuses the two candidate streams into one ranked list.
///
/// Semantic candidates form the base set and keep their first occurrence. A keyword candidate
/// whose id is already present turns a semantic entry into a hybrid one with a boosted score,
/// capped at 1.0; otherwise it is appended as a keyword match. The merged list is stably sorted
/// by score descending, truncated to `limit`, and ranked from 1.
pub fn blend(
	semantic: Vec<SearchResult>,
	fulltext: Vec<SearchResult>,
	limit: usize,
) -> Vec<SearchResult> {
	let mut positions: HashMap<String, usize> = HashMap::new();
	let mut merged: Vec<SearchResult> = Vec::with_capacity(semantic.len() + fulltext.len());

	for result in semantic {
		if positions.contains_key(&result.entity_id) {
			continue;
		}

		positions.insert(result.entity_id.clone(), merged.len());
		merged.push(result);
	}

	for result in fulltext {
		match positions.get(&result.entity_id) {
			Some(&pos) => {
				let existing = &mut merged[pos];

				if existing.match_type == MatchType::Semantic {
					existing.match_type = MatchType::Hybrid;
					existing.similarity_score = boost(existing.similarity_score);
				}
			},
			None => {
				positions.insert(result.entity_id.clone(), merged.len());
				merged.push(result);
			},
		}
	}

	merged.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
	merged.truncate(limit);

	for (idx, result) in merged.iter_mut().enumerate() {
		result.rank_position = u32::try_from(idx + 1).unwrap_or(u32::MAX);
	}

	merged
}

fn boost(score: f32) -> f32 {
	(score * HYBRID_BOOST).min(1.0)
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use super::*;

	fn candidate(id: &str, score: f32, match_type: MatchType) -> SearchResult {
		SearchResult {
			entity_id: id.to_string(),
			entity_title: format!("Title {id}"),
			entity_title_ar: None,
			description_en: None,
			description_ar: None,
			similarity_score: score,
			entity_type: "positions".to_string(),
			entity_subtype: None,
			updated_at: datetime!(2026-01-15 08:00 UTC),
			metadata: None,
			match_type,
			rank_position: 0,
		}
	}

	fn ids(results: &[SearchResult]) -> Vec<&str> {
		results.iter().map(|r| r.entity_id.as_str()).collect()
	}

	#[test]
	fn sorts_by_score_and_ranks_from_one() {
		let semantic = vec![
			candidate("a", 0.62, MatchType::Semantic),
			candidate("b", 0.91, MatchType::Semantic),
			candidate("c", 0.75, MatchType::Semantic),
		];
		let blended = blend(semantic, Vec::new(), 10);

		assert_eq!(ids(&blended), vec!["b", "c", "a"]);
		assert_eq!(blended.iter().map(|r| r.rank_position).collect::<Vec<_>>(), vec![1, 2, 3]);
	}

	#[test]
	fn shared_entities_become_hybrid_with_capped_boost() {
		let semantic = vec![
			candidate("a", 0.8, MatchType::Semantic),
			candidate("b", 0.95, MatchType::Semantic),
		];
		let fulltext = vec![
			candidate("a", 0.3, MatchType::Fulltext),
			candidate("b", 0.2, MatchType::Fulltext),
			candidate("c", 0.5, MatchType::Fulltext),
		];
		let blended = blend(semantic, fulltext, 10);

		assert_eq!(ids(&blended), vec!["b", "a", "c"]);
		assert_eq!(blended[0].match_type, MatchType::Hybrid);
		assert_eq!(blended[0].similarity_score, 1.0);
		assert_eq!(blended[1].match_type, MatchType::Hybrid);
		assert!((blended[1].similarity_score - 0.88).abs() < 1e-6);
		assert_eq!(blended[2].match_type, MatchType::Fulltext);
	}

	#[test]
	fn boost_applies_once_per_entity() {
		let semantic = vec![candidate("a", 0.5, MatchType::Semantic)];
		let fulltext = vec![
			candidate("a", 0.4, MatchType::Fulltext),
			candidate("a", 0.4, MatchType::Fulltext),
		];
		let blended = blend(semantic, fulltext, 10);

		assert_eq!(blended.len(), 1);
		assert!((blended[0].similarity_score - 0.55).abs() < 1e-6);
	}

	#[test]
	fn keyword_duplicates_never_become_hybrid() {
		let fulltext = vec![
			candidate("a", 0.4, MatchType::Fulltext),
			candidate("a", 0.3, MatchType::Fulltext),
		];
		let blended = blend(Vec::new(), fulltext, 10);

		assert_eq!(blended.len(), 1);
		assert_eq!(blended[0].match_type, MatchType::Fulltext);
		assert!((blended[0].similarity_score - 0.4).abs() < 1e-6);
	}

	#[test]
	fn first_semantic_occurrence_wins() {
		let semantic = vec![
			candidate("a", 0.7, MatchType::Semantic),
			candidate("a", 0.9, MatchType::Semantic),
		];
		let blended = blend(semantic, Vec::new(), 10);

		assert_eq!(blended.len(), 1);
		assert!((blended[0].similarity_score - 0.7).abs() < 1e-6);
	}

	#[test]
	fn ties_keep_insertion_order() {
		let semantic = vec![
			candidate("x", 0.7, MatchType::Semantic),
			candidate("y", 0.7, MatchType::Semantic),
		];
		let fulltext = vec![candidate("z", 0.7, MatchType::Fulltext)];
		let blended = blend(semantic, fulltext, 10);

		assert_eq!(ids(&blended), vec!["x", "y", "z"]);
	}

	#[test]
	fn truncates_before_ranking() {
		let semantic = (0..8)
			.map(|i| candidate(&format!("s{i}"), 0.9 - i as f32 * 0.05, MatchType::Semantic))
			.collect();
		let blended = blend(semantic, Vec::new(), 3);

		assert_eq!(ids(&blended), vec!["s0", "s1", "s2"]);
		assert_eq!(blended.last().map(|r| r.rank_position), Some(3));
	}

	#[test]
	fn empty_streams_blend_to_nothing() {
		assert!(blend(Vec::new(), Vec::new(), 50).is_empty());
	}

	#[test]
	fn repeated_blends_are_identical() {
		let make = || {
			(
				vec![
					candidate("a", 0.7, MatchType::Semantic),
					candidate("b", 0.7, MatchType::Semantic),
					candidate("c", 0.9, MatchType::Semantic),
				],
				vec![candidate("b", 0.1, MatchType::Fulltext), candidate("d", 0.7, MatchType::Fulltext)],
			)
		};
		let (s1, f1) = make();
		let (s2, f2) = make();

		assert_eq!(blend(s1, f1, 10), blend(s2, f2, 10));
	}
}
