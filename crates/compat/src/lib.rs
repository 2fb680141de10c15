use anyhow::{bail, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
pub use tc_graph as graph;
use tc_graph::{Graph, OpNode};
use thiserror::Error;

pub mod allowlist;
pub use allowlist::{is_allowed, TPU_ALLOWED_OPS};

#[derive(Debug, Error)]
pub enum CompatError {
    #[error("pipeline violation: {0}")]
    Pipeline(&'static str),
}

/// Returns true if the node's op is valid for the TPU.
///
/// A node explicitly routed to a non-TPU device is assumed valid regardless
/// of allow-list membership. Otherwise membership decides; unknown ops fail
/// closed. The device check is a substring heuristic on the lowercased
/// device string, matching how runtimes name TPU devices.
pub fn op_valid(node: &OpNode) -> bool {
    // If assigned a device, and it is not the TPU, assume op is valid
    if let Some(device) = node.device.as_deref() {
        if !device.is_empty() && !device.to_lowercase().contains("tpu") {
            return true;
        }
    }
    is_allowed(&node.op)
}

/// Annotate every node, and every in/out embedding of every node, with its
/// own compatibility flag. Embeddings are judged on their own op/device and
/// are not traversed further (the embedding model is one level deep).
pub fn check_ops_for_compatibility(g: &mut Graph) {
    for node in g.nodes.values_mut() {
        node.compatible = op_valid(node);
        for e in &mut node.in_embeddings {
            e.compatible = op_valid(e);
        }
        for e in &mut node.out_embeddings {
            e.compatible = op_valid(e);
        }
    }
}

pub trait Pass {
    fn name(&self) -> &str;
    fn run(&self, g: Graph) -> Result<Graph>;
}

pub struct NoOpPass;
impl Pass for NoOpPass {
    fn name(&self) -> &str { "no-op" }
    fn run(&self, g: Graph) -> Result<Graph> { Ok(g) }
}

pub struct ValidatePass;
impl Pass for ValidatePass {
    fn name(&self) -> &str { "validate" }
    fn run(&self, g: Graph) -> Result<Graph> {
        g.validate().map_err(|e| anyhow::anyhow!(e.to_string()))?;
        Ok(g)
    }
}

/// Runs the compatibility traversal and records a summary under the
/// `compatibility` graph attribute (counts plus distinct incompatible ops).
pub struct CompatibilityPass;
impl Pass for CompatibilityPass {
    fn name(&self) -> &str { "compat" }
    fn run(&self, mut g: Graph) -> Result<Graph> {
        check_ops_for_compatibility(&mut g);

        let mut visited = 0usize;
        let mut compatible = 0usize;
        let mut incompatible_ops: BTreeSet<String> = BTreeSet::new();
        {
            let mut tally = |n: &OpNode| {
                visited += 1;
                if n.compatible {
                    compatible += 1;
                } else {
                    incompatible_ops.insert(n.op.clone());
                }
            };
            for node in g.nodes.values() {
                tally(node);
                for e in node.in_embeddings.iter().chain(node.out_embeddings.iter()) {
                    tally(e);
                }
            }
        }

        let meta = serde_json::json!({
            "visited": visited,
            "compatible": compatible,
            "incompatible": visited - compatible,
            "incompatible_ops": incompatible_ops.iter().collect::<Vec<_>>(),
        });
        tracing::debug!(graph = %g.name, visited, compatible, "compatibility check done");
        g.attributes.insert("compatibility".to_string(), meta);
        Ok(g)
    }
}

pub enum DumpFormat {
    Json,
    Yaml,
    #[cfg(feature = "bin")]
    Bin,
}

pub struct PipelineConfig {
    pub passes: Vec<String>,
    pub dump_dir: Option<PathBuf>,
    pub dump_formats: Vec<DumpFormat>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            passes: vec!["validate".into(), "compat".into()],
            dump_dir: None,
            dump_formats: vec![DumpFormat::Json],
        }
    }
}

pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    pub fn new() -> Self { Self { passes: Vec::new() } }
    pub fn add_pass<P: Pass + 'static>(&mut self, p: P) { self.passes.push(Box::new(p)); }

    pub fn run(&self, mut g: Graph) -> Result<Graph> {
        for p in &self.passes {
            tracing::debug!(pass = p.name(), "running pass");
            g = p.run(g)?;
        }
        Ok(g)
    }

    pub fn run_with_config(&self, mut g: Graph, cfg: &PipelineConfig) -> Result<Graph> {
        for (idx, p) in self.passes.iter().enumerate() {
            tracing::debug!(pass = p.name(), "running pass");
            g = p.run(g)?;
            if let Some(dir) = &cfg.dump_dir {
                dump_graph(&g, dir, idx, p.name(), &cfg.dump_formats)?;
            }
        }
        Ok(g)
    }
}

impl Default for PassManager {
    fn default() -> Self { Self::new() }
}

fn dump_graph(g: &Graph, dir: &Path, idx: usize, pass: &str, fmts: &[DumpFormat]) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let base = format!("{:02}_{}", idx, pass.replace('/', "_"));
    for f in fmts {
        match f {
            DumpFormat::Json => {
                let s = g.to_json_string().map_err(|e| anyhow::anyhow!(e))?;
                fs::write(dir.join(format!("{base}.json")), s)?;
            }
            DumpFormat::Yaml => {
                let s = g.to_yaml_string().map_err(|e| anyhow::anyhow!(e))?;
                fs::write(dir.join(format!("{base}.yaml")), s)?;
            }
            #[cfg(feature = "bin")]
            DumpFormat::Bin => {
                let b = g.to_bytes().map_err(|e| anyhow::anyhow!(e))?;
                fs::write(dir.join(format!("{base}.bin")), b)?;
            }
        }
    }
    Ok(())
}

/// Build a pipeline by pass names (string identifiers)
pub fn build_pipeline(pm: &mut PassManager, names: &[String]) -> Result<()> {
    for n in names {
        match n.as_str() {
            "noop" | "no-op" => pm.add_pass(NoOpPass),
            "validate" => pm.add_pass(ValidatePass),
            "compat" | "compatibility" => pm.add_pass(CompatibilityPass),
            other => bail!("unknown pass '{other}'"),
        }
    }
    Ok(())
}
