//! Tool Registry - central registration and lookup for all tools.
//!
//! The registry is assembled once at startup through [`ToolRegistryBuilder`]
//! and is immutable afterwards, so it can be shared across connections
//! behind an `Arc` without locking.

use std::collections::HashMap;
use std::sync::Arc;

use rmcp::model::Tool;
use tracing::debug;

use super::definitions::{DivideNumbersTool, MultiplyNumbersTool};
use super::descriptor::ToolDescriptor;
use super::error::ToolError;

/// Tool registry - manages all available tools.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<ToolDescriptor>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Start building a registry.
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// Registry pre-populated with the built-in math tools.
    pub fn with_builtin_tools() -> Result<Self, ToolError> {
        Ok(Self::builder()
            .register(MultiplyNumbersTool::descriptor())?
            .register(DivideNumbersTool::descriptor())?
            .build())
    }

    /// Look up a tool by name.
    pub fn resolve(&self, name: &str) -> Result<Arc<ToolDescriptor>, ToolError> {
        self.index
            .get(name)
            .map(|&i| self.tools[i].clone())
            .ok_or_else(|| ToolError::not_found(name))
    }

    /// Registered descriptors, in registration order.
    pub fn tools(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.iter().map(|t| &**t)
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools().map(|t| &*t.name).collect()
    }

    /// Get all tools as Tool models (metadata), in registration order.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools().map(ToolDescriptor::to_tool).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Builder for [`ToolRegistry`].
#[derive(Debug, Default)]
pub struct ToolRegistryBuilder {
    registry: ToolRegistry,
}

impl ToolRegistryBuilder {
    /// Register a tool. Fails if a tool with the same name already exists.
    pub fn register(mut self, descriptor: ToolDescriptor) -> Result<Self, ToolError> {
        let name = descriptor.name.to_string();
        if self.registry.index.contains_key(&name) {
            return Err(ToolError::duplicate(name));
        }

        debug!("Registering tool: {}", name);
        self.registry.index.insert(name, self.registry.tools.len());
        self.registry.tools.push(Arc::new(descriptor));
        Ok(self)
    }

    pub fn build(self) -> ToolRegistry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::descriptor::ParamSpec;
    use serde_json::json;

    fn noop(name: &'static str) -> ToolDescriptor {
        ToolDescriptor::new(name, "does nothing", vec![ParamSpec::number("x")], |_| {
            Ok(json!(null))
        })
    }

    #[test]
    fn test_builtin_tool_names() {
        let registry = ToolRegistry::with_builtin_tools().unwrap();
        assert_eq!(
            registry.tool_names(),
            vec!["multiply_numbers", "divide_numbers"]
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_resolve() {
        let registry = ToolRegistry::with_builtin_tools().unwrap();
        let tool = registry.resolve("divide_numbers").unwrap();
        assert_eq!(tool.name, "divide_numbers");
        assert!(matches!(
            registry.resolve("nonexistent_tool"),
            Err(ToolError::NotFound(name)) if name == "nonexistent_tool"
        ));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let result = ToolRegistry::builder()
            .register(noop("same"))
            .and_then(|b| b.register(noop("same")));
        assert!(matches!(result, Err(ToolError::Duplicate(name)) if name == "same"));
    }

    #[test]
    fn test_list_tools_matches_names() {
        let registry = ToolRegistry::builder()
            .register(noop("first"))
            .and_then(|b| b.register(noop("second")))
            .unwrap()
            .build();

        let listed: Vec<_> = registry
            .list_tools()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(listed, vec!["first", "second"]);
        assert!(!registry.is_empty());
    }
}
