use serde::Serialize;
use std::fmt;

/// Logical label grouping cached query results for bulk invalidation.
#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize)]
pub enum CacheTag {
    Products,
    Recipes,
    Notifications,
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CacheTag::Products => "Products",
            CacheTag::Recipes => "Recipes",
            CacheTag::Notifications => "Notifications",
        };
        f.write_str(name)
    }
}

/// Identifies one cached read: the endpoint name plus its serialized args.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct QueryKey {
    pub endpoint: &'static str,
    pub args: String,
}

impl QueryKey {
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            endpoint,
            args: String::new(),
        }
    }

    pub fn with_args(endpoint: &'static str, args: impl Into<String>) -> Self {
        Self {
            endpoint,
            args: args.into(),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.endpoint, self.args)
    }
}
