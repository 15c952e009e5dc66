use axum::extract::{Path as UrlPath, Request, State};
use axum::response::{IntoResponse, Response};
use std::path::{Component, Path, PathBuf};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::error::AppError;
use crate::state::AppState;

/// Landing document served for `/`.
pub const INDEX_FILE: &str = "index.html";

/// Directory static assets are served from.
///
/// Only plain, non-hidden file names directly inside the root are servable.
/// The resolved path is canonicalised so symlinks cannot lead outside it.
#[derive(Debug)]
pub struct DocumentRoot {
    root: PathBuf,
}

impl DocumentRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let root = match std::fs::canonicalize(&path) {
            Ok(root) => root,
            Err(e) => {
                tracing::warn!("document root {:?} is not accessible: {e}", path);
                path
            }
        };
        Self { root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Map a requested file name to a file under the root.
    pub async fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.starts_with('.') {
            return None;
        }

        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return None,
        }

        let full = tokio::fs::canonicalize(self.root.join(name)).await.ok()?;
        if !full.starts_with(&self.root) {
            tracing::warn!("refusing asset {name:?}: resolves outside document root");
            return None;
        }

        let metadata = tokio::fs::metadata(&full).await.ok()?;
        metadata.is_file().then_some(full)
    }
}

pub async fn index(State(state): State<AppState>, req: Request) -> Result<Response, AppError> {
    serve(&state.assets, INDEX_FILE, req).await
}

pub async fn file(
    State(state): State<AppState>,
    UrlPath(name): UrlPath<String>,
    req: Request,
) -> Result<Response, AppError> {
    serve(&state.assets, &name, req).await
}

async fn serve(root: &DocumentRoot, name: &str, req: Request) -> Result<Response, AppError> {
    let path = root
        .resolve(name)
        .await
        .ok_or_else(|| AppError::NotFound("file not found".to_string()))?;

    match ServeFile::new(path).oneshot(req).await {
        Ok(response) => Ok(response.into_response()),
        Err(never) => match never {},
    }
}
