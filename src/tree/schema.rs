//! Tree document schema.
//!
//! All types derive Serde traits for deserialization from TOML.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root of a tree document.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct TreeSpec {
    pub root: NodeSpec,
}

/// A non-terminal node.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct NodeSpec {
    /// Role a principal needs to cross into this node.
    pub requires: Option<String>,

    /// Served for a trailing separator at this node.
    pub index: Option<EndpointSpec>,

    /// Catch-all for paths that fail below this node.
    pub default: Option<EndpointSpec>,

    /// Dynamic lookup redirecting to a target node.
    pub lookup: Option<LookupSpec>,

    /// Custom router replacing segment descent at this node.
    pub route: Option<RouteSpec>,

    /// Terminal handlers addressed by a single segment.
    pub endpoints: BTreeMap<String, EndpointSpec>,

    /// Nested nodes addressed by a single segment.
    pub children: BTreeMap<String, NodeSpec>,
}

/// A terminal handler.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EndpointSpec {
    /// HTTP status served on success.
    pub status: u16,

    /// Optional text included in the response.
    pub body: Option<String>,

    /// Role a principal needs to be served this handler.
    pub requires: Option<String>,

    /// Non-exposed endpoints are invisible to dispatch.
    pub exposed: bool,

    /// Serve this index handler even without the trailing separator.
    pub accept_noncanonical: bool,
}

impl Default for EndpointSpec {
    fn default() -> Self {
        Self {
            status: 200,
            body: None,
            requires: None,
            exposed: true,
            accept_noncanonical: false,
        }
    }
}

/// Lookup taking `min_args..=max_args` leading segments.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LookupSpec {
    #[serde(default = "default_min_args")]
    pub min_args: usize,

    /// `None` accepts any number of trailing segments.
    #[serde(default)]
    pub max_args: Option<usize>,

    /// When set, the first argument must be one of these values.
    #[serde(default)]
    pub accept: Option<Vec<String>>,

    /// Node traversal resumes at, with the first `min_args` segments consumed.
    pub target: Box<NodeSpec>,
}

fn default_min_args() -> usize {
    1
}

/// Router that drops `skip` segments and continues at `target`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouteSpec {
    #[serde(default)]
    pub skip: usize,

    pub target: Box<NodeSpec>,
}
