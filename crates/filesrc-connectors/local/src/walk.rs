use filesrc_core::{Error, Result};
use futures::stream::{self, BoxStream, StreamExt};
use glob::MatchOptions;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::debug;

const LISTING_BUFFER: usize = 64;

/// List regular files under `root` as `/` separated paths relative to it.
///
/// `glob` walks the tree on a blocking thread and hands paths over a bounded
/// channel. Nothing runs until the stream is first polled, and the walk stops
/// once the stream is dropped.
pub(crate) fn list_files(root: PathBuf) -> BoxStream<'static, Result<String>> {
    stream::once(async move {
        let (tx, rx) = mpsc::channel(LISTING_BUFFER);
        tokio::task::spawn_blocking(move || walk(&root, &tx));
        stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        })
    })
    .flatten()
    .boxed()
}

fn walk(root: &Path, tx: &mpsc::Sender<Result<String>>) {
    if !root.is_dir() {
        let _ = tx.blocking_send(Err(Error::Connection(format!(
            "'{}' is not a readable directory",
            root.display()
        ))));
        return;
    }

    let pattern = format!(
        "{}/**/*",
        glob::Pattern::escape(root.to_string_lossy().trim_end_matches('/'))
    );
    let paths = match glob::glob_with(&pattern, MatchOptions::new()) {
        Ok(paths) => paths,
        Err(e) => {
            let _ = tx.blocking_send(Err(Error::Pattern {
                pattern,
                message: e.to_string(),
            }));
            return;
        }
    };

    for entry in paths {
        let item = match entry {
            Ok(path) if !path.is_file() => continue,
            Ok(path) => match relative_path(root, &path) {
                Some(relative) => Ok(relative),
                None => continue,
            },
            Err(e) => Err(Error::Connection(format!(
                "Failed to list '{}': {}",
                e.path().display(),
                e.error()
            ))),
        };

        if tx.blocking_send(item).is_err() {
            debug!(root = %root.display(), "Listing stopped, receiver dropped");
            return;
        }
    }
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    Some(
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/"),
    )
}
