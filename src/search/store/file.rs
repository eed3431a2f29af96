use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CorpusError;

use super::{Chunk, Index};

/// On-disk index layout: the chunk and embedding arrays are parallel and
/// index-aligned; position is the join key.
#[derive(Serialize, Deserialize)]
struct IndexFile {
    model: String,
    dimensions: usize,
    chunks: Vec<Chunk>,
    embeddings: Vec<Vec<f32>>,
}

/// Flat-file persistence for the corpus index.
///
/// One file per corpus version. A rebuild writes a fresh temp file and
/// renames it over the old one, so readers always see a complete index.
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn size_bytes(&self) -> u64 {
        fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }

    /// Persist a built index, atomically replacing any previous version.
    pub fn persist(&self, index: &Index) -> Result<(), CorpusError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut chunks = Vec::with_capacity(index.len());
        let mut embeddings = Vec::with_capacity(index.len());
        for entry in index.entries() {
            chunks.push(entry.chunk.clone());
            embeddings.push(entry.embedding.clone());
        }

        let file = IndexFile {
            model: index.model().to_string(),
            dimensions: index.dimensions(),
            chunks,
            embeddings,
        };

        let temp_path = self.path.with_extension("tmp");
        let json = serde_json::to_vec(&file)?;
        fs::write(&temp_path, json)?;
        fs::rename(temp_path, &self.path)?;

        Ok(())
    }

    /// Load and validate the index from disk.
    ///
    /// Fails when the file is missing or malformed, when the chunk and
    /// embedding arrays differ in length, or when any embedding disagrees
    /// with the declared dimensionality.
    pub fn load(&self) -> Result<Index, CorpusError> {
        if !self.path.exists() {
            return Err(CorpusError::Missing(self.path.clone()));
        }

        let content = fs::read(&self.path)?;
        let file: IndexFile = serde_json::from_slice(&content)?;

        Index::build(file.model, file.dimensions, file.chunks, file.embeddings)
    }

    /// Load the index and verify it was built by the configured embedder.
    ///
    /// Vectors from different models (or dimensionalities) are not
    /// comparable, so a mismatch is a load failure rather than a silent
    /// source of meaningless scores.
    pub fn load_for_embedder(&self, model: &str, dimensions: usize) -> Result<Index, CorpusError> {
        let index = self.load()?;

        if index.model() != model || index.dimensions() != dimensions {
            return Err(CorpusError::ModelMismatch {
                indexed: index.model().to_string(),
                indexed_dims: index.dimensions(),
                configured: model.to_string(),
                configured_dims: dimensions,
            });
        }

        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::store::CourseChunk;
    use tempfile::tempdir;

    fn chunk(content: &str) -> Chunk {
        Chunk::Course(CourseChunk {
            content: content.to_string(),
            title: "Section".to_string(),
            url: "https://course.example.edu/#/page".to_string(),
            file: "page.md".to_string(),
            hash: "abc".to_string(),
        })
    }

    fn sample_index() -> Index {
        Index::build(
            "all-minilm",
            3,
            vec![chunk("first chunk"), chunk("second chunk")],
            vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.5]],
        )
        .unwrap()
    }

    #[test]
    fn persist_and_reload_round_trip() {
        let dir = tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("index.json"));

        store.persist(&sample_index()).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.model(), "all-minilm");
        assert_eq!(loaded.entries()[0].chunk, chunk("first chunk"));
        assert_eq!(loaded.entries()[1].embedding, vec![0.0, 1.0, 0.5]);
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("nope.json"));
        assert!(matches!(store.load(), Err(CorpusError::Missing(_))));
    }

    #[test]
    fn load_malformed_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.json");
        fs::write(&path, b"not json at all").unwrap();

        let store = IndexStore::new(path);
        assert!(matches!(store.load(), Err(CorpusError::Malformed(_))));
    }

    #[test]
    fn load_rejects_parallel_array_drift() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.json");
        let doc = serde_json::json!({
            "model": "all-minilm",
            "dimensions": 3,
            "chunks": [
                {"source": "course_content", "content": "c", "title": "t",
                 "url": "u", "file": "f.md", "hash": "h"}
            ],
            "embeddings": []
        });
        fs::write(&path, serde_json::to_vec(&doc).unwrap()).unwrap();

        let store = IndexStore::new(path);
        assert!(matches!(
            store.load(),
            Err(CorpusError::LengthMismatch { chunks: 1, embeddings: 0 })
        ));
    }

    #[test]
    fn load_for_embedder_rejects_model_mismatch() {
        let dir = tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("index.json"));
        store.persist(&sample_index()).unwrap();

        let err = store.load_for_embedder("nomic-embed-text", 768).unwrap_err();
        assert!(matches!(err, CorpusError::ModelMismatch { .. }));

        assert!(store.load_for_embedder("all-minilm", 3).is_ok());
    }

    #[test]
    fn persist_replaces_previous_version() {
        let dir = tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("index.json"));

        store.persist(&sample_index()).unwrap();
        let replacement = Index::build("all-minilm", 3, vec![chunk("only")], vec![vec![0.0; 3]])
            .unwrap();
        store.persist(&replacement).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.entries()[0].chunk.content(), "only");
    }
}
