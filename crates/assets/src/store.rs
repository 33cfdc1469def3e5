use crate::AssetError;
use crate::obj::ObjFile;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;
use thingview_kernel::Thing;

/// Content-addressed model ID computed from the `.obj` source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub u64);

/// Registry of parsed models, keyed by content hash.
///
/// Registering identical source twice yields the same id and a single entry.
#[derive(Debug, Clone, Default)]
pub struct ModelStore {
    models: BTreeMap<ModelId, ObjFile>,
}

impl ModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and register `.obj` source text.
    pub fn register(&mut self, source: &str) -> Result<ModelId, AssetError> {
        let id = content_hash(source);
        if !self.models.contains_key(&id) {
            let file = ObjFile::parse(source)?;
            self.models.insert(id, file);
            tracing::debug!(id = id.0, "model registered");
        }
        Ok(id)
    }

    /// Read, parse and register an `.obj` file.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<ModelId, AssetError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        self.register(&source)
    }

    pub fn get(&self, id: ModelId) -> Option<&ObjFile> {
        self.models.get(&id)
    }

    /// Build a fresh Thing (new id) from a registered model.
    pub fn instantiate(&self, id: ModelId, name: impl Into<String>) -> Result<Thing, AssetError> {
        self.get(id)
            .ok_or(AssetError::NotFound(id))?
            .merged_thing(name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

fn content_hash(source: &str) -> ModelId {
    let digest = Sha256::digest(source.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    ModelId(u64::from_le_bytes(bytes))
}
