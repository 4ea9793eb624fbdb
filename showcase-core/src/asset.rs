//! Background model loading with a one-shot resolution.
//!
//! A handle starts `Pending` and resolves exactly once to `Ready` or
//! `Failed`. Hosts check it between frames; nothing here runs inside a frame.

use std::fmt;
use std::path::{Path, PathBuf};
use std::thread;

use futures::channel::oneshot;

use crate::scene::SceneModel;
use crate::stl::{self, StlError};

#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model: {0}")]
    Parse(#[from] StlError),

    #[error("model has no geometry")]
    Empty,

    #[error("loader stopped before resolving")]
    Canceled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    Pending,
    Ready,
    Failed,
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssetStatus::Pending => "loading",
            AssetStatus::Ready => "ready",
            AssetStatus::Failed => "unavailable",
        })
    }
}

type Outcome = Result<SceneModel, AssetError>;

enum Slot {
    Pending(oneshot::Receiver<Outcome>),
    Resolved(AssetStatus),
}

/// A model that may still be loading
pub struct AssetHandle {
    name: String,
    slot: Slot,
}

impl AssetHandle {
    fn channel(name: impl Into<String>) -> (oneshot::Sender<Outcome>, Self) {
        let (tx, rx) = oneshot::channel();
        let handle = Self {
            name: name.into(),
            slot: Slot::Pending(rx),
        };
        (tx, handle)
    }

    /// Already loaded; resolves on the first check
    pub fn ready(model: SceneModel) -> Self {
        let (tx, handle) = Self::channel(model.root.name.clone());
        // The receiver is alive in `handle`
        let _ = tx.send(Ok(model));
        handle
    }

    /// Already failed; resolves on the first check
    pub fn failed(name: impl Into<String>, error: AssetError) -> Self {
        let (tx, handle) = Self::channel(name);
        let _ = tx.send(Err(error));
        handle
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> AssetStatus {
        match self.slot {
            Slot::Pending(_) => AssetStatus::Pending,
            Slot::Resolved(status) => status,
        }
    }

    /// Take the outcome if the load has finished. Returns `Some` at most once.
    pub fn try_resolve(&mut self) -> Option<Outcome> {
        let Slot::Pending(rx) = &mut self.slot else {
            return None;
        };
        let outcome = match rx.try_recv() {
            Ok(None) => return None,
            Ok(Some(outcome)) => outcome,
            Err(oneshot::Canceled) => Err(AssetError::Canceled),
        };
        Some(self.settle(outcome))
    }

    /// Block until the load finishes. `None` if it was already taken.
    pub fn wait(&mut self) -> Option<Outcome> {
        let Slot::Pending(rx) = &mut self.slot else {
            return None;
        };
        let outcome = futures::executor::block_on(rx).unwrap_or(Err(AssetError::Canceled));
        Some(self.settle(outcome))
    }

    fn settle(&mut self, outcome: Outcome) -> Outcome {
        let status = match &outcome {
            Ok(model) => {
                log::info!("model '{}' ready ({} meshes)", self.name, model.drawables().len());
                AssetStatus::Ready
            }
            Err(e) => {
                log::warn!("model '{}' unavailable, keeping placeholder: {}", self.name, e);
                AssetStatus::Failed
            }
        };
        self.slot = Slot::Resolved(status);
        outcome
    }
}

impl fmt::Debug for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetHandle")
            .field("name", &self.name)
            .field("status", &self.status())
            .finish()
    }
}

/// Loads STL models from disk
pub struct AssetLoader;

impl AssetLoader {
    /// Read and parse on a background thread
    pub fn spawn(path: impl Into<PathBuf>) -> AssetHandle {
        let path = path.into();
        let (tx, handle) = AssetHandle::channel(model_name(&path));

        let spawned = thread::Builder::new()
            .name("asset-loader".to_string())
            .spawn(move || {
                let _ = tx.send(Self::load(&path));
            });
        // On failure the sender is dropped with the closure and the handle
        // resolves as canceled.
        if let Err(e) = spawned {
            log::warn!("could not start asset loader thread: {}", e);
        }
        handle
    }

    pub fn load(path: &Path) -> Result<SceneModel, AssetError> {
        let data = std::fs::read(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(model_name(path), &data)
    }

    pub fn from_bytes(name: impl Into<String>, data: &[u8]) -> Result<SceneModel, AssetError> {
        let mesh = stl::parse_stl(data)?;
        if mesh.is_empty() {
            return Err(AssetError::Empty);
        }
        log::debug!("parsed {} triangles", mesh.triangles.len());
        Ok(SceneModel::from_mesh(name, mesh))
    }
}

fn model_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string())
}
