// src/db/json_store.rs

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::common::error::AppError;

/// Persistência em documentos JSON inteiros, um arquivo por documento.
///
/// Leituras nunca falham: arquivo ausente ou inválido vira `None`.
/// Escritas substituem o arquivo por inteiro via arquivo temporário + rename,
/// então um leitor nunca enxerga um documento pela metade.
#[derive(Clone)]
pub struct JsonStore {
    data_dir: PathBuf,
    locks: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl JsonStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    pub async fn read<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        read_document(&self.path_of(name)).await
    }

    /// Trava o documento para um ciclo ler-modificar-escrever.
    ///
    /// A trava só vale dentro deste processo; entre processos a última escrita vence.
    pub async fn lock(&self, name: &str) -> DocumentGuard {
        let mutex = {
            let mut locks = self
                .locks
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            locks.entry(name.to_string()).or_default().clone()
        };

        DocumentGuard {
            path: self.path_of(name),
            _guard: mutex.lock_owned().await,
        }
    }
}

pub struct DocumentGuard {
    path: PathBuf,
    _guard: OwnedMutexGuard<()>,
}

impl DocumentGuard {
    pub async fn read<T: DeserializeOwned>(&self) -> Option<T> {
        read_document(&self.path).await
    }

    pub async fn write<T: Serialize>(&self, value: &T) -> Result<(), AppError> {
        write_document(&self.path, value).await
    }
}

async fn read_document<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!("Falha ao ler {}: {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Documento {} inválido, tratado como vazio: {}", path.display(), e);
            None
        }
    }
}

async fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let content = serde_json::to_string_pretty(value)?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // Nome único por escrita: duas escritas simultâneas nunca dividem o temporário.
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

    tokio::fs::write(&tmp_path, content).await?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_document_reads_as_none() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::new(tmp.path());

        let value: Option<Vec<Value>> = store.read("nothing.json").await;
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn corrupt_document_reads_as_none() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("broken.json"), "{ not json").unwrap();
        let store = JsonStore::new(tmp.path());

        let value: Option<Vec<Value>> = store.read("broken.json").await;
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn write_creates_dir_and_keeps_unicode() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::new(tmp.path().join("nested"));

        let doc = store.lock("doc.json").await;
        doc.write(&json!([{ "nome": "Padaria São João" }])).await.unwrap();

        let raw = std::fs::read_to_string(tmp.path().join("nested/doc.json")).unwrap();
        assert!(raw.contains("São João"));
        assert!(raw.contains("\n  "));

        let leftovers: Vec<_> = std::fs::read_dir(tmp.path().join("nested"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn locked_updates_do_not_lose_writes() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::new(tmp.path());

        let mut handles = Vec::new();
        for i in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let doc = store.lock("counter.json").await;
                let mut items: Vec<u32> = doc.read().await.unwrap_or_default();
                items.push(i);
                doc.write(&items).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let items: Vec<u32> = store.read("counter.json").await.unwrap();
        assert_eq!(items.len(), 10);
    }
}
