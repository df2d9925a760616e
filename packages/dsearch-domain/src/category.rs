use std::fmt;

use serde::{Deserialize, Serialize};

/// A searchable entity category. `Dossiers` is composite and covers the four dossier subtypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
	Dossiers,
	Country,
	Organization,
	Forum,
	Theme,
	Positions,
	Documents,
	Briefs,
	Engagements,
	Persons,
	ExternalContacts,
	WorkingGroups,
}
impl EntityCategory {
	pub const ALL: [Self; 12] = [
		Self::Dossiers,
		Self::Country,
		Self::Organization,
		Self::Forum,
		Self::Theme,
		Self::Positions,
		Self::Documents,
		Self::Briefs,
		Self::Engagements,
		Self::Persons,
		Self::ExternalContacts,
		Self::WorkingGroups,
	];
	pub const DEFAULT: [Self; 6] = [
		Self::Dossiers,
		Self::Positions,
		Self::Documents,
		Self::Briefs,
		Self::Engagements,
		Self::Persons,
	];
	pub const DOSSIER_SUBTYPES: [Self; 4] =
		[Self::Country, Self::Organization, Self::Forum, Self::Theme];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Dossiers => "dossiers",
			Self::Country => "country",
			Self::Organization => "organization",
			Self::Forum => "forum",
			Self::Theme => "theme",
			Self::Positions => "positions",
			Self::Documents => "documents",
			Self::Briefs => "briefs",
			Self::Engagements => "engagements",
			Self::Persons => "persons",
			Self::ExternalContacts => "external_contacts",
			Self::WorkingGroups => "working_groups",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		let raw = raw.trim();

		Self::ALL.into_iter().find(|category| category.as_str() == raw)
	}

	pub fn is_composite(self) -> bool {
		matches!(self, Self::Dossiers)
	}

	/// Concrete members of a composite category; empty for non-composites.
	pub fn members(self) -> &'static [Self] {
		match self {
			Self::Dossiers => &Self::DOSSIER_SUBTYPES,
			_ => &[],
		}
	}

	/// Physical full-text group backing this category, if it has one.
	pub fn fulltext_group(self) -> Option<FulltextGroup> {
		match self {
			Self::Dossiers | Self::Country | Self::Organization | Self::Forum | Self::Theme =>
				Some(FulltextGroup::Dossiers),
			Self::Positions => Some(FulltextGroup::Positions),
			Self::Documents => Some(FulltextGroup::Documents),
			Self::Engagements => Some(FulltextGroup::Engagements),
			Self::Persons => Some(FulltextGroup::People),
			Self::ExternalContacts => Some(FulltextGroup::ExternalContacts),
			Self::Briefs | Self::WorkingGroups => None,
		}
	}
}
impl fmt::Display for EntityCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FulltextGroup {
	Dossiers,
	Positions,
	Documents,
	Engagements,
	People,
	ExternalContacts,
}
impl FulltextGroup {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Dossiers => "dossiers",
			Self::Positions => "positions",
			Self::Documents => "documents",
			Self::Engagements => "engagements",
			Self::People => "people",
			Self::ExternalContacts => "external_contacts",
		}
	}
}
impl fmt::Display for FulltextGroup {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryRejectReason {
	NoValidCategories,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryResolution {
	/// Concrete categories to query, deduplicated in request order.
	pub categories: Vec<EntityCategory>,
	/// Requested identifiers that did not name a category.
	pub unknown: Vec<String>,
}

/// Resolves the requested identifiers into the categories to query.
///
/// `None` selects `defaults`. With non-empty `subtype_filters`, composite categories expand to
/// the filtered subtypes that belong to them; filters naming anything else are ignored.
pub fn resolve_categories(
	requested: Option<&[String]>,
	subtype_filters: Option<&[String]>,
	defaults: &[EntityCategory],
) -> Result<CategoryResolution, CategoryRejectReason> {
	let mut unknown = Vec::new();
	let known: Vec<EntityCategory> = match requested {
		Some(raw) => raw
			.iter()
			.filter_map(|id| {
				let parsed = EntityCategory::parse(id);

				if parsed.is_none() {
					unknown.push(id.clone());
				}

				parsed
			})
			.collect(),
		None => defaults.to_vec(),
	};
	let filters: Vec<EntityCategory> = subtype_filters
		.unwrap_or_default()
		.iter()
		.filter_map(|id| EntityCategory::parse(id))
		.collect();
	let has_filters = subtype_filters.is_some_and(|raw| !raw.is_empty());
	let mut categories = Vec::with_capacity(known.len());

	for category in known {
		if has_filters && category.is_composite() {
			for subtype in filters.iter().filter(|subtype| category.members().contains(*subtype)) {
				push_unique(&mut categories, *subtype);
			}
		} else {
			push_unique(&mut categories, category);
		}
	}

	if categories.is_empty() {
		return Err(CategoryRejectReason::NoValidCategories);
	}

	Ok(CategoryResolution { categories, unknown })
}

/// Distinct full-text groups behind `categories`, in first-seen order.
pub fn fulltext_groups(categories: &[EntityCategory]) -> Vec<FulltextGroup> {
	let mut groups = Vec::new();

	for group in categories.iter().filter_map(|category| category.fulltext_group()) {
		if !groups.contains(&group) {
			groups.push(group);
		}
	}

	groups
}

pub fn valid_category_list() -> String {
	EntityCategory::ALL.iter().map(|category| category.as_str()).collect::<Vec<_>>().join(", ")
}

fn push_unique(categories: &mut Vec<EntityCategory>, category: EntityCategory) {
	if !categories.contains(&category) {
		categories.push(category);
	}
}
