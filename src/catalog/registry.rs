// ABOUTME: Flat registry of functions and topics keyed by qualified name
// ABOUTME: Built once through RegistryBuilder, read-only afterwards

use std::collections::HashMap;

use crate::catalog::descriptor::{Descriptor, FunctionDescriptor, TopicDescriptor};
use crate::catalog::name;
use crate::error::Error;

/// Accumulates descriptors before the registry is frozen
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: HashMap<String, Descriptor>,
}

impl RegistryBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a function or topic descriptor
    ///
    /// Names are unique across functions and topics combined.
    pub fn register(&mut self, descriptor: impl Into<Descriptor>) -> Result<(), Error> {
        let descriptor = descriptor.into();
        let qualified_name = descriptor.qualified_name().to_string();
        name::validate(&qualified_name)?;

        if self.entries.contains_key(&qualified_name) {
            return Err(Error::DuplicateName(qualified_name));
        }

        self.entries.insert(qualified_name, descriptor);
        Ok(())
    }

    /// Chaining form of [`register`](Self::register)
    pub fn with(mut self, descriptor: impl Into<Descriptor>) -> Result<Self, Error> {
        self.register(descriptor)?;
        Ok(self)
    }

    /// Freeze the registry
    ///
    /// Every replacement named by a deprecated function must itself be a
    /// registered function that is not deprecated.
    pub fn build(self) -> Result<Registry, Error> {
        for descriptor in self.entries.values() {
            let Some(function) = descriptor.as_function() else {
                continue;
            };
            let Some(replacement) = function.replacement.as_deref() else {
                continue;
            };

            let callable = self
                .entries
                .get(replacement)
                .and_then(Descriptor::as_function)
                .is_some_and(|target| !target.deprecated);

            if !callable {
                return Err(Error::DanglingReplacement {
                    name: function.qualified_name.clone(),
                    replacement: replacement.to_string(),
                });
            }
        }

        log::debug!("Registry frozen with {} entries", self.entries.len());

        Ok(Registry {
            entries: self.entries,
        })
    }
}

/// Read-only catalog of remote functions and topics
#[derive(Debug)]
pub struct Registry {
    entries: HashMap<String, Descriptor>,
}

impl Registry {
    /// Start building a registry
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Look up a function by qualified name
    pub fn lookup_function(&self, qualified_name: &str) -> Result<&FunctionDescriptor, Error> {
        self.entries
            .get(qualified_name)
            .and_then(Descriptor::as_function)
            .ok_or_else(|| Error::UnknownFunction(qualified_name.to_string()))
    }

    /// Look up a topic by qualified name
    pub fn lookup_topic(&self, qualified_name: &str) -> Result<&TopicDescriptor, Error> {
        self.entries
            .get(qualified_name)
            .and_then(Descriptor::as_topic)
            .ok_or_else(|| Error::UnknownTopic(qualified_name.to_string()))
    }

    /// Look up any entry by qualified name
    pub fn get(&self, qualified_name: &str) -> Option<&Descriptor> {
        self.entries.get(qualified_name)
    }

    /// Whether a function or topic is registered under this name
    pub fn contains(&self, qualified_name: &str) -> bool {
        self.entries.contains_key(qualified_name)
    }

    /// All registered functions, in no particular order
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDescriptor> {
        self.entries.values().filter_map(Descriptor::as_function)
    }

    /// All registered topics, in no particular order
    pub fn topics(&self) -> impl Iterator<Item = &TopicDescriptor> {
        self.entries.values().filter_map(Descriptor::as_topic)
    }

    /// Entries at or below a dotted prefix, sorted by name
    pub fn namespace(&self, prefix: &str) -> Vec<&Descriptor> {
        let mut found: Vec<&Descriptor> = self
            .entries
            .values()
            .filter(|d| name::is_within(d.qualified_name(), prefix))
            .collect();
        found.sort_by(|a, b| a.qualified_name().cmp(b.qualified_name()));
        found
    }

    /// Number of functions and topics
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
