use crate::error::{AskdeskError, Result};
use crate::ingest::Chunk;
use rusqlite::{params, Connection};
use std::path::Path;
use tokio::task;

/// Chunk store connection wrapper
pub struct Db {
    path: std::path::PathBuf,
}

impl Db {
    /// Create a new chunk store manager
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            path: db_path.as_ref().to_path_buf(),
        }
    }

    /// Execute a closure with a database connection in a blocking task
    pub async fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        task::spawn_blocking(move || {
            let mut conn = Connection::open(&path).map_err(AskdeskError::Database)?;

            // WAL for concurrent readers during rebuilds, NORMAL sync for speed
            conn.execute_batch(
                "PRAGMA journal_mode = WAL; \
                 PRAGMA synchronous = NORMAL; \
                 PRAGMA foreign_keys = ON; \
                 PRAGMA temp_store = MEMORY;",
            )?;

            f(&mut conn)
        })
        .await
        .map_err(|e| AskdeskError::Backend(format!("database task panicked: {}", e)))?
    }

    /// Create the chunks table if it does not exist
    pub async fn init_schema(&self) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS chunks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    source TEXT NOT NULL,
                    sequence_no INTEGER NOT NULL,
                    content TEXT NOT NULL,
                    embedding BLOB
                );",
            )?;
            Ok(())
        })
        .await
    }

    /// Atomically replace the whole store with a freshly ingested chunk set.
    ///
    /// `embeddings` must be either `None` (keyword-only store) or exactly one
    /// vector per chunk. The delete and all inserts run in one transaction, so
    /// concurrent readers observe either the prior complete set or the new one,
    /// never a partial state.
    pub async fn replace_chunks(
        &self,
        chunks: Vec<Chunk>,
        embeddings: Option<Vec<Vec<f32>>>,
    ) -> Result<usize> {
        if let Some(ref vectors) = embeddings {
            if vectors.len() != chunks.len() {
                return Err(AskdeskError::Backend(format!(
                    "embedding count {} does not match chunk count {}",
                    vectors.len(),
                    chunks.len()
                )));
            }
        }

        self.with_connection(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM chunks", [])?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO chunks (source, sequence_no, content, embedding)
                     VALUES (?1, ?2, ?3, ?4)",
                )?;
                for (i, chunk) in chunks.iter().enumerate() {
                    let blob = embeddings
                        .as_ref()
                        .map(|vectors| encode_embedding(&vectors[i]));
                    stmt.execute(params![
                        chunk.source,
                        chunk.sequence_no as i64,
                        chunk.content,
                        blob
                    ])?;
                }
            }
            tx.commit()?;
            Ok(chunks.len())
        })
        .await
    }

    /// Load every stored chunk in insertion order (original document order)
    pub async fn load_chunks(&self) -> Result<Vec<Chunk>> {
        self.with_connection(|conn| {
            let mut stmt =
                conn.prepare("SELECT source, sequence_no, content FROM chunks ORDER BY id")?;
            let mut rows = stmt.query([])?;
            let mut chunks = Vec::new();
            while let Some(row) = rows.next()? {
                chunks.push(Chunk {
                    source: row.get(0)?,
                    sequence_no: row.get::<_, i64>(1)? as usize,
                    content: row.get(2)?,
                });
            }
            Ok(chunks)
        })
        .await
    }

    /// Load chunks together with their embedding vectors, skipping rows without one
    pub async fn load_embedded_chunks(&self) -> Result<Vec<(Chunk, Vec<f32>)>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT source, sequence_no, content, embedding FROM chunks
                 WHERE embedding IS NOT NULL ORDER BY id",
            )?;
            let mut rows = stmt.query([])?;
            let mut results = Vec::new();
            while let Some(row) = rows.next()? {
                let chunk = Chunk {
                    source: row.get(0)?,
                    sequence_no: row.get::<_, i64>(1)? as usize,
                    content: row.get(2)?,
                };
                let blob: Vec<u8> = row.get(3)?;
                if let Some(embedding) = decode_embedding(&blob) {
                    results.push((chunk, embedding));
                }
            }
            Ok(results)
        })
        .await
    }

    /// Count stored chunks, split by whether an embedding is attached
    pub async fn chunk_counts(&self) -> Result<(usize, usize)> {
        self.with_connection(|conn| {
            let total: i64 = conn.query_row("SELECT COUNT(*) FROM chunks", [], |r| r.get(0))?;
            let embedded: i64 = conn.query_row(
                "SELECT COUNT(*) FROM chunks WHERE embedding IS NOT NULL",
                [],
                |r| r.get(0),
            )?;
            Ok((total as usize, embedded as usize))
        })
        .await
    }
}

/// Encode an embedding as a little-endian f32 BLOB
pub fn encode_embedding(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Decode a little-endian f32 BLOB back into a vector
///
/// Returns None when the blob length is not a multiple of 4.
pub fn decode_embedding(blob: &[u8]) -> Option<Vec<f32>> {
    if blob.len() % 4 != 0 {
        return None;
    }

    blob.chunks(4)
        .map(|bytes| {
            let arr: [u8; 4] = bytes.try_into().ok()?;
            Some(f32::from_le_bytes(arr))
        })
        .collect()
}
