pub type Result<T, E = Error> = std::result::Result<T, E>;

/// `EmptyQuery` and `InvalidEntityTypes` reject a request. `Provider` and `Storage` come from the
/// dependency seams and are absorbed into warnings before a response is built.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Query is required and cannot be empty.")]
	EmptyQuery,
	#[error("Invalid entity_types. Valid types: {valid}.")]
	InvalidEntityTypes { valid: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<dsearch_providers::Error> for Error {
	fn from(err: dsearch_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<dsearch_storage::Error> for Error {
	fn from(err: dsearch_storage::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
