/// Trims the raw query and rejects input that carries no searchable text.
pub fn normalize_query(raw: &str) -> Option<&str> {
	let trimmed = raw.trim();

	if trimmed.is_empty() { None } else { Some(trimmed) }
}

#[cfg(test)]
mod tests {
	use super::normalize_query;

	#[test]
	fn trims_surrounding_whitespace() {
		assert_eq!(normalize_query("  trade policy \n"), Some("trade policy"));
	}

	#[test]
	fn rejects_whitespace_only_input() {
		assert_eq!(normalize_query(""), None);
		assert_eq!(normalize_query(" \t\u{3000}\n"), None);
	}
}
