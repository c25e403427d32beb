use std::fmt;
use std::str::FromStr;
use streamlist_config::CatalogConfig;

/// Orderings the discover endpoint accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DiscoverSort {
    #[default]
    PopularityDesc,
    VoteAverageDesc,
    ReleaseDateDesc,
    TitleAsc,
}

impl DiscoverSort {
    pub fn as_param(self) -> &'static str {
        match self {
            DiscoverSort::PopularityDesc => "popularity.desc",
            DiscoverSort::VoteAverageDesc => "vote_average.desc",
            DiscoverSort::ReleaseDateDesc => "release_date.desc",
            DiscoverSort::TitleAsc => "title.asc",
        }
    }

    /// The configured `catalog.default_sort`
    pub fn from_config(config: &CatalogConfig) -> anyhow::Result<Self> {
        config
            .default_sort
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid catalog.default_sort: {}", e))
    }
}

impl fmt::Display for DiscoverSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

impl FromStr for DiscoverSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "popularity.desc" => Ok(DiscoverSort::PopularityDesc),
            "vote_average.desc" => Ok(DiscoverSort::VoteAverageDesc),
            "release_date.desc" => Ok(DiscoverSort::ReleaseDateDesc),
            "title.asc" => Ok(DiscoverSort::TitleAsc),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

/// A load intent from the caller
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchRequest {
    pub page: u32,
    pub search_term: String,
    pub genre_filter: Option<u32>,
    pub sort: DiscoverSort,
}

/// What is being listed, independent of which page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogQuery {
    Search { term: String },
    Discover { genre: Option<u32>, sort: DiscoverSort },
}

impl SearchRequest {
    pub fn search(term: impl Into<String>, page: u32) -> Self {
        Self {
            page,
            search_term: term.into(),
            ..Self::default()
        }
    }

    pub fn discover(page: u32, genre_filter: Option<u32>, sort: DiscoverSort) -> Self {
        Self {
            page,
            search_term: String::new(),
            genre_filter,
            sort,
        }
    }

    /// First discover page in the configured default order
    pub fn from_config(config: &CatalogConfig) -> anyhow::Result<Self> {
        Ok(Self::discover(1, None, DiscoverSort::from_config(config)?))
    }

    /// A non-blank search term wins; genre and sort only apply to discover
    pub fn query(&self) -> CatalogQuery {
        let term = self.search_term.trim();
        if term.is_empty() {
            CatalogQuery::Discover {
                genre: self.genre_filter,
                sort: self.sort,
            }
        } else {
            CatalogQuery::Search {
                term: term.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_term_ignores_genre_and_sort() {
        let request = SearchRequest {
            page: 1,
            search_term: "  batman ".to_string(),
            genre_filter: Some(28),
            sort: DiscoverSort::TitleAsc,
        };
        assert_eq!(request.query(), CatalogQuery::Search { term: "batman".to_string() });
    }

    #[test]
    fn test_blank_term_is_discover() {
        let request = SearchRequest::discover(2, Some(35), DiscoverSort::VoteAverageDesc);
        assert_eq!(
            request.query(),
            CatalogQuery::Discover { genre: Some(35), sort: DiscoverSort::VoteAverageDesc }
        );
        assert_eq!(SearchRequest::search("   ", 1).query(), CatalogQuery::Discover {
            genre: None,
            sort: DiscoverSort::PopularityDesc,
        });
    }

    #[test]
    fn test_sort_param_round_trip() {
        for sort in [
            DiscoverSort::PopularityDesc,
            DiscoverSort::VoteAverageDesc,
            DiscoverSort::ReleaseDateDesc,
            DiscoverSort::TitleAsc,
        ] {
            assert_eq!(sort.as_param().parse::<DiscoverSort>().unwrap(), sort);
        }
        assert!("runtime.asc".parse::<DiscoverSort>().is_err());
    }

    #[test]
    fn test_default_sort_from_config() {
        let config = CatalogConfig {
            default_sort: "vote_average.desc".to_string(),
            ..CatalogConfig::default()
        };
        assert_eq!(DiscoverSort::from_config(&config).unwrap(), DiscoverSort::VoteAverageDesc);

        let request = SearchRequest::from_config(&config).unwrap();
        assert_eq!(request.page, 1);
        assert_eq!(
            request.query(),
            CatalogQuery::Discover { genre: None, sort: DiscoverSort::VoteAverageDesc }
        );

        assert_eq!(
            DiscoverSort::from_config(&CatalogConfig::default()).unwrap(),
            DiscoverSort::PopularityDesc
        );
    }

    #[test]
    fn test_unknown_default_sort_rejected() {
        let config = CatalogConfig {
            default_sort: "runtime.asc".to_string(),
            ..CatalogConfig::default()
        };
        assert!(DiscoverSort::from_config(&config).is_err());
        assert!(SearchRequest::from_config(&config).is_err());
    }
}
