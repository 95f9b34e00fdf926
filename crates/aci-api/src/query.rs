// Query filter encoding.
//
// The controller accepts a fixed set of query-string options on class and
// managed-object queries. Values are passed through untouched: callers
// supply strings that are already safe in a query position.

use serde::{Deserialize, Serialize};

/// Optional query-string parameters understood by the controller.
///
/// Fields are encoded in declaration order. An empty string is the same as
/// `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct QueryFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_subtree_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_target_filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsp_subtree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsp_subtree_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsp_subtree_filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsp_subtree_include: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsp_prop_include: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every parameter as `(controller key, value)`, in encoding order.
    pub fn pairs(&self) -> [(&'static str, Option<&str>); 9] {
        [
            ("query-target", self.query_target.as_deref()),
            ("target-subtree-class", self.target_subtree_class.as_deref()),
            ("query-target-filter", self.query_target_filter.as_deref()),
            ("rsp-subtree", self.rsp_subtree.as_deref()),
            ("rsp-subtree-class", self.rsp_subtree_class.as_deref()),
            ("rsp-subtree-filter", self.rsp_subtree_filter.as_deref()),
            ("rsp-subtree-include", self.rsp_subtree_include.as_deref()),
            ("rsp-prop-include", self.rsp_prop_include.as_deref()),
            ("order-by", self.order_by.as_deref()),
        ]
    }

    /// `true` when no parameter carries a value.
    pub fn is_empty(&self) -> bool {
        self.pairs()
            .into_iter()
            .all(|(_, v)| v.is_none_or(str::is_empty))
    }

    /// Encode as `?k=v&k=v`, or an empty string when nothing is set.
    pub fn encode(&self) -> String {
        let fragments: Vec<String> = self
            .pairs()
            .into_iter()
            .filter_map(|(key, value)| match value {
                Some(v) if !v.is_empty() => Some(format!("{key}={v}")),
                _ => None,
            })
            .collect();

        if fragments.is_empty() {
            String::new()
        } else {
            format!("?{}", fragments.join("&"))
        }
    }

    // ── Builder setters ──────────────────────────────────────────────

    pub fn query_target(mut self, v: impl Into<String>) -> Self {
        self.query_target = Some(v.into());
        self
    }

    pub fn target_subtree_class(mut self, v: impl Into<String>) -> Self {
        self.target_subtree_class = Some(v.into());
        self
    }

    pub fn query_target_filter(mut self, v: impl Into<String>) -> Self {
        self.query_target_filter = Some(v.into());
        self
    }

    pub fn rsp_subtree(mut self, v: impl Into<String>) -> Self {
        self.rsp_subtree = Some(v.into());
        self
    }

    pub fn rsp_subtree_class(mut self, v: impl Into<String>) -> Self {
        self.rsp_subtree_class = Some(v.into());
        self
    }

    pub fn rsp_subtree_filter(mut self, v: impl Into<String>) -> Self {
        self.rsp_subtree_filter = Some(v.into());
        self
    }

    pub fn rsp_subtree_include(mut self, v: impl Into<String>) -> Self {
        self.rsp_subtree_include = Some(v.into());
        self
    }

    pub fn rsp_prop_include(mut self, v: impl Into<String>) -> Self {
        self.rsp_prop_include = Some(v.into());
        self
    }

    pub fn order_by(mut self, v: impl Into<String>) -> Self {
        self.order_by = Some(v.into());
        self
    }
}
