//! Event chains: ordered topic segments from most general to most specific.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Ordered sequence of segment names addressing a node in the topic tree.
///
/// The empty chain addresses the root node, whose listeners receive every
/// publication. A bare string converts into a single-segment chain; use
/// [`Chain::from_dotted`] to split a dotted topic name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chain(Vec<String>);

impl Chain {
    /// Chain addressing the root node.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a chain from any sequence of segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Split a dotted topic name (`"top.tierA.tierB"`) into segments.
    ///
    /// Empty pieces are discarded, so `""` and `"."` both yield the root.
    #[must_use]
    pub fn from_dotted(topic: &str) -> Self {
        Self::new(topic.split('.').filter(|piece| !piece.is_empty()))
    }

    /// Segments of the chain in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments; the root has depth zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this chain addresses the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Chain made of the first `depth` segments.
    #[must_use]
    pub fn prefix(&self, depth: usize) -> Self {
        Self(self.0[..depth.min(self.0.len())].to_vec())
    }

    /// Append a segment, returning the extended chain.
    #[must_use]
    pub fn child(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }
}

impl Display for Chain {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return formatter.write_str("<root>");
        }
        formatter.write_str(&self.0.join("."))
    }
}

impl From<&str> for Chain {
    fn from(segment: &str) -> Self {
        Self(vec![segment.to_owned()])
    }
}

impl From<String> for Chain {
    fn from(segment: String) -> Self {
        Self(vec![segment])
    }
}

impl<const N: usize> From<[&str; N]> for Chain {
    fn from(segments: [&str; N]) -> Self {
        Self::new(segments)
    }
}

impl From<&[&str]> for Chain {
    fn from(segments: &[&str]) -> Self {
        Self::new(segments.iter().copied())
    }
}

impl From<Vec<&str>> for Chain {
    fn from(segments: Vec<&str>) -> Self {
        Self::new(segments)
    }
}

impl From<Vec<String>> for Chain {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<&Chain> for Chain {
    fn from(chain: &Chain) -> Self {
        chain.clone()
    }
}
