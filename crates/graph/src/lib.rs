use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single operation instance in a computation graph.
///
/// Embeddings are auxiliary nodes folded into this node's input or output
/// side (small constants, summary consumers). They are one level deep: an
/// embedded node never carries embeddings of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpNode {
    pub name: String,
    pub op: String,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub compatible: bool,
    #[serde(default)]
    pub in_embeddings: Vec<OpNode>,
    #[serde(default)]
    pub out_embeddings: Vec<OpNode>,
    #[serde(default)]
    pub attributes: serde_json::Value,
}

impl OpNode {
    pub fn new(name: impl Into<String>, op: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            op: op.into(),
            device: None,
            compatible: false,
            in_embeddings: Vec::new(),
            out_embeddings: Vec::new(),
            attributes: serde_json::Value::Null,
        }
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError(pub String);

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "graph validation error: {}", self.0)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    pub name: String,
    #[serde(default)]
    pub nodes: IndexMap<String, OpNode>,
    #[serde(default)]
    pub attributes: IndexMap<String, serde_json::Value>,
}

impl Graph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            attributes: IndexMap::new(),
        }
    }

    /// Insert a node, keyed by its own name.
    pub fn add_node(&mut self, node: OpNode) {
        self.nodes.insert(node.name.clone(), node);
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
    pub fn from_yaml_str(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }

    #[cfg(feature = "bin")]
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    #[cfg(feature = "bin")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }

    /// Validate structural integrity of the graph.
    /// Checks:
    /// - map key matches the node's own name; name and op non-empty
    /// - every embedded node (in/out, one level) has a non-empty name and op
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (key, node) in &self.nodes {
            if node.name.trim().is_empty() {
                return Err(ValidationError("node name cannot be empty".into()));
            }
            if key != &node.name {
                return Err(ValidationError(format!(
                    "node key '{}' does not match node name '{}'",
                    key, node.name
                )));
            }
            validate_node(node)?;
            for e in node.in_embeddings.iter().chain(node.out_embeddings.iter()) {
                if e.name.trim().is_empty() {
                    return Err(ValidationError(format!(
                        "embedding of '{}' has empty name",
                        node.name
                    )));
                }
                validate_node(e)?;
            }
        }
        Ok(())
    }

    /// Ensure the 'graph_version' attribute is present with the current VERSION.
    pub fn ensure_version_tag(&mut self) {
        if !self.attributes.contains_key("graph_version") {
            self.attributes.insert("graph_version".to_string(), serde_json::json!(VERSION));
        }
    }
}

fn validate_node(node: &OpNode) -> Result<(), ValidationError> {
    if node.op.trim().is_empty() {
        return Err(ValidationError(format!("node '{}' missing op", node.name)));
    }
    Ok(())
}

pub const VERSION: &str = "0.0.1";
