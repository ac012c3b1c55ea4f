use serde::{Deserialize, Deserializer};
use utoipa::{IntoParams, ToSchema};

pub const MAX_LIST_LIMIT: u32 = 500;

/// Listing request as seen by the lifecycle service.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AssetListFilter {
    /// Only the caller's own assets; requires a session. Any value but `true` means the feed.
    #[serde(default, deserialize_with = "deserialize_mine")]
    pub mine: bool,
    /// Maximum number of assets to return (1-500)
    pub limit: Option<u32>,
}

fn deserialize_mine<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.is_some_and(|value| value.eq_ignore_ascii_case("true")))
}

/// Store-level query: already resolved to an owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetQuery {
    pub owner_id: Option<String>,
    pub limit: Option<u32>,
}

impl AssetQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn owned_by(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: Some(owner_id.into()),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(mine: &str) -> AssetListFilter {
        serde_json::from_value(serde_json::json!({ "mine": mine })).unwrap()
    }

    #[test]
    fn test_only_true_selects_own_assets() {
        assert!(filter("true").mine);
        assert!(filter("TRUE").mine);
        assert!(!filter("false").mine);
        assert!(!filter("1").mine);
        assert!(!filter("").mine);
    }

    #[test]
    fn test_missing_mine_means_feed() {
        let filter: AssetListFilter = serde_json::from_str("{}").unwrap();
        assert!(!filter.mine);
        assert_eq!(filter.limit, None);
    }
}
