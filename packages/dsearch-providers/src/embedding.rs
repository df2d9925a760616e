use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Embeds a single query and returns a vector of exactly `cfg.dimensions` values.
pub async fn embed(cfg: &dsearch_config::EmbeddingProviderConfig, text: &str) -> Result<Vec<f32>> {
	if cfg.api_base.is_empty() {
		return Err(Error::InvalidConfig {
			message: "Embedding provider is not configured.".to_string(),
		});
	}

	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({ "text": text });
	let res = client
		.post(url)
		.headers(crate::auth_headers(cfg.api_key.as_deref(), &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;
	let vector = parse_embedding_response(&json)?;

	Ok(normalize_dimensions(vector, cfg.dimensions as usize))
}

/// Zero-pads on the right or truncates so every vector has `target` values.
pub fn normalize_dimensions(mut vector: Vec<f32>, target: usize) -> Vec<f32> {
	vector.resize(target, 0.0);

	vector
}

fn parse_embedding_response(json: &Value) -> Result<Vec<f32>> {
	let embedding = json
		.get("embedding")
		.or_else(|| {
			json.get("data")
				.and_then(|v| v.as_array())
				.and_then(|items| items.first())
				.and_then(|item| item.get("embedding"))
		})
		.and_then(|v| v.as_array())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Embedding response is missing an embedding array.".to_string(),
		})?;

	if embedding.is_empty() {
		return Err(Error::InvalidResponse { message: "Embedding array is empty.".to_string() });
	}

	let mut vec = Vec::with_capacity(embedding.len());

	for value in embedding {
		let number = value.as_f64().ok_or_else(|| Error::InvalidResponse {
			message: "Embedding value must be numeric.".to_string(),
		})?;

		vec.push(number as f32);
	}

	Ok(vec)
}
