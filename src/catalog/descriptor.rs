// ABOUTME: Descriptor types for remote functions and subscribable topics
// ABOUTME: Immutable records keyed by dotted qualified name

use serde::{Deserialize, Serialize};

/// A remote function callable through the dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    /// Dotted qualified name, e.g. `ak.wwise.core.object.create`
    #[serde(rename = "name")]
    pub qualified_name: String,
    /// Human readable summary
    #[serde(default)]
    pub description: String,
    /// Set when the function is kept only for older clients
    #[serde(default)]
    pub deprecated: bool,
    /// Function that supersedes this one, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

impl FunctionDescriptor {
    /// Create a current (non-deprecated) function descriptor
    pub fn new(qualified_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            description: description.into(),
            deprecated: false,
            replacement: None,
        }
    }

    /// Mark the function deprecated, optionally naming its replacement
    pub fn deprecated(mut self, replacement: Option<&str>) -> Self {
        self.deprecated = true;
        self.replacement = replacement.map(str::to_string);
        self
    }

    /// Deprecated and nothing to fall back on
    pub fn is_withdrawn(&self) -> bool {
        self.deprecated && self.replacement.is_none()
    }
}

/// An event topic clients can subscribe to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicDescriptor {
    /// Dotted qualified name, e.g. `ak.wwise.core.object.created`
    #[serde(rename = "name")]
    pub qualified_name: String,
    /// Human readable summary
    #[serde(default)]
    pub description: String,
}

impl TopicDescriptor {
    /// Create a topic descriptor
    pub fn new(qualified_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            description: description.into(),
        }
    }
}

/// Either kind of catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    /// Remote function
    Function(FunctionDescriptor),
    /// Event topic
    Topic(TopicDescriptor),
}

impl Descriptor {
    /// Qualified name of the entry
    pub fn qualified_name(&self) -> &str {
        match self {
            Descriptor::Function(f) => &f.qualified_name,
            Descriptor::Topic(t) => &t.qualified_name,
        }
    }

    /// Description of the entry
    pub fn description(&self) -> &str {
        match self {
            Descriptor::Function(f) => &f.description,
            Descriptor::Topic(t) => &t.description,
        }
    }

    /// Function descriptor, if this entry is one
    pub fn as_function(&self) -> Option<&FunctionDescriptor> {
        match self {
            Descriptor::Function(f) => Some(f),
            Descriptor::Topic(_) => None,
        }
    }

    /// Topic descriptor, if this entry is one
    pub fn as_topic(&self) -> Option<&TopicDescriptor> {
        match self {
            Descriptor::Topic(t) => Some(t),
            Descriptor::Function(_) => None,
        }
    }
}

impl From<FunctionDescriptor> for Descriptor {
    fn from(f: FunctionDescriptor) -> Self {
        Descriptor::Function(f)
    }
}

impl From<TopicDescriptor> for Descriptor {
    fn from(t: TopicDescriptor) -> Self {
        Descriptor::Topic(t)
    }
}
