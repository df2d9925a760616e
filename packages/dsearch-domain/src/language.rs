use serde::{Deserialize, Serialize};

/// Share of Arabic characters above which a query is treated as Arabic.
pub const ARABIC_RATIO_THRESHOLD: f32 = 0.30;

/// Language requested by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguagePreference {
	En,
	Ar,
	#[default]
	Auto,
}

/// Language used for ranking and keyword search configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryLanguage {
	En,
	Ar,
}
impl QueryLanguage {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::En => "en",
			Self::Ar => "ar",
		}
	}

	/// Text search configuration name understood by the datastore.
	pub fn text_search_config(self) -> &'static str {
		match self {
			Self::En => "english",
			Self::Ar => "arabic",
		}
	}
}

/// An explicit preference wins; `auto` falls back to [`detect_language`].
pub fn resolve_language(query: &str, preference: LanguagePreference) -> QueryLanguage {
	match preference {
		LanguagePreference::En => QueryLanguage::En,
		LanguagePreference::Ar => QueryLanguage::Ar,
		LanguagePreference::Auto => detect_language(query),
	}
}

pub fn detect_language(text: &str) -> QueryLanguage {
	if arabic_ratio(text) > ARABIC_RATIO_THRESHOLD { QueryLanguage::Ar } else { QueryLanguage::En }
}

/// Fraction of non-whitespace characters that fall in the Arabic blocks, counted as typed.
pub fn arabic_ratio(text: &str) -> f32 {
	let mut arabic = 0usize;
	let mut non_space = 0usize;

	for ch in text.chars() {
		if ch.is_whitespace() {
			continue;
		}

		non_space += 1;

		if is_arabic_char(ch) {
			arabic += 1;
		}
	}

	if non_space == 0 {
		return 0.0;
	}

	arabic as f32 / non_space as f32
}

pub fn is_arabic_char(ch: char) -> bool {
	matches!(ch as u32, 0x0600..=0x06FF | 0x0750..=0x077F | 0x08A0..=0x08FF)
}
