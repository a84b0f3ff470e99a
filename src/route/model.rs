use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

/// A keyword search over post authors and bodies.
#[derive(Debug, Default, Deserialize, Validate, JsonSchema)]
pub struct SearchInput {
	/// Case-insensitive keyword, at most 256 characters. Empty matches every post.
	#[validate(length(max = 256))]
	#[serde(default)]
	pub q: String,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct IdInput {
	pub id: u64,
}

#[cfg(test)]
mod test {
	use validator::Validate;

	use super::*;

	#[test]
	fn test_search_input_length() {
		let search = SearchInput { q: "a".repeat(256) };

		assert!(search.validate().is_ok());

		let search = SearchInput { q: "a".repeat(257) };

		assert!(search.validate().is_err());
	}

	#[test]
	fn test_search_input_defaults_empty() {
		let search: SearchInput = serde_json::from_str("{}").unwrap();

		assert_eq!(search.q, "");
	}
}
