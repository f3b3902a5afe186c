use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::model::Page;
use crate::sources::page_slug;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("cannot read snapshot {path} for {url}: {source}")]
    Snapshot {
        url: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where page HTML comes from: the live site or a snapshot directory
/// written by [`save_snapshot`].
#[derive(Clone)]
pub enum Source {
    Http(reqwest::Client),
    Dir(PathBuf),
}

impl Source {
    /// HTTP source. A zero timeout means requests may wait forever.
    pub fn http(timeout_secs: u64) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("tu_buildings/", env!("CARGO_PKG_VERSION")));
        if timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Source::Http(client))
    }

    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Source::Dir(path.into())
    }

    async fn get(&self, url: &str) -> Result<String, FetchError> {
        match self {
            Source::Http(client) => {
                let request_err = |source: reqwest::Error| FetchError::Request {
                    url: url.to_string(),
                    source,
                };
                let response = client.get(url).send().await.map_err(request_err)?;
                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Status {
                        url: url.to_string(),
                        status,
                    });
                }
                response.text().await.map_err(request_err)
            }
            Source::Dir(dir) => {
                let path = snapshot_path(dir, url);
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|source| FetchError::Snapshot {
                        url: url.to_string(),
                        path,
                        source,
                    })
            }
        }
    }
}

/// Snapshot file for `url` inside `dir`.
pub fn snapshot_path(dir: &Path, url: &str) -> PathBuf {
    dir.join(format!("{}.html", page_slug(url)))
}

/// Fetch every URL and return the pages in the order given.
///
/// With `concurrency` 1 each page is awaited before the next starts. Higher
/// values overlap requests but the result order never depends on arrival.
/// The first failing page (in list order) aborts the whole run.
pub async fn fetch_all(source: &Source, urls: &[String], concurrency: usize) -> Result<Vec<Page>> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));

    let pb = ProgressBar::new(urls.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let failed = Arc::new(AtomicBool::new(false));
    let mut handles = Vec::with_capacity(urls.len());
    for url in urls {
        // Permits are taken in list order, so with one permit pages are
        // fetched and logged strictly in sequence.
        let permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .context("Fetch semaphore closed")?;
        if failed.load(Ordering::SeqCst) {
            break;
        }

        let source = source.clone();
        let failed = Arc::clone(&failed);
        let url = url.clone();
        let pb = pb.clone();

        handles.push(tokio::spawn(async move {
            let _permit = permit;
            info!("Downloading {}", url);
            let html = match source.get(&url).await {
                Ok(html) => html,
                Err(e) => {
                    failed.store(true, Ordering::SeqCst);
                    return Err(e);
                }
            };
            debug!("{} bytes from {}", html.len(), url);
            pb.inc(1);
            Ok::<Page, FetchError>(Page { url, html })
        }));
    }

    let mut pages = Vec::with_capacity(handles.len());
    let mut pending = handles.into_iter();
    while let Some(handle) = pending.next() {
        match handle.await.context("Fetch task panicked")? {
            Ok(page) => pages.push(page),
            Err(e) => {
                for rest in pending {
                    rest.abort();
                }
                pb.abandon();
                return Err(e.into());
            }
        }
    }

    pb.finish_and_clear();
    info!("Fetched {} pages", pages.len());
    Ok(pages)
}

/// Write pages as `<slug>.html` files so later runs can use [`Source::Dir`].
pub fn save_snapshot(dir: &Path, pages: &[Page]) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create snapshot dir {}", dir.display()))?;
    for page in pages {
        let path = snapshot_path(dir, &page.url);
        std::fs::write(&path, &page.html)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Saved {} -> {}", page.url, path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn snapshot_roundtrip_keeps_order() {
        let tmp = TempDir::new("fetch").unwrap();
        let pages = vec![
            Page { url: "https://u.test/campus/one/index.jsp".into(), html: "<p>1</p>".into() },
            Page { url: "https://u.test/campus/two/index.jsp".into(), html: "<p>2</p>".into() },
            Page { url: "https://u.test/campus/three/index.jsp".into(), html: "<p>3</p>".into() },
        ];
        save_snapshot(tmp.path(), &pages).unwrap();
        assert!(tmp.path().join("two.html").exists());

        let list: Vec<String> = pages.iter().rev().map(|p| p.url.clone()).collect();
        let source = Source::dir(tmp.path());
        let got = fetch_all(&source, &list, 3).await.unwrap();
        let htmls: Vec<&str> = got.iter().map(|p| p.html.as_str()).collect();
        assert_eq!(htmls, vec!["<p>3</p>", "<p>2</p>", "<p>1</p>"]);
        assert_eq!(got[0].url, list[0]);
    }

    #[tokio::test]
    async fn missing_snapshot_aborts() {
        let tmp = TempDir::new("fetch").unwrap();
        std::fs::write(tmp.path().join("one.html"), "ok").unwrap();
        let source = Source::dir(tmp.path());
        let err = fetch_all(
            &source,
            &urls(&["https://u.test/campus/one/x", "https://u.test/campus/gone/x"]),
            1,
        )
        .await
        .unwrap_err();
        let fetch_err = err.downcast_ref::<FetchError>().unwrap();
        assert!(matches!(fetch_err, FetchError::Snapshot { url, .. } if url.contains("gone")));
    }

    /// Minimal HTTP server: `/missing` answers 404, every other path 200.
    async fn serve_pages() -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        match stream.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        }
                    }
                    let request = String::from_utf8_lossy(&buf);
                    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                    let (status, body) = if path == "/missing" {
                        ("404 Not Found", "gone".to_string())
                    } else {
                        ("200 OK", format!("<p>{}</p>", path))
                    };
                    let response = format!(
                        "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn http_pages_in_order() {
        let base = serve_pages().await;
        let source = Source::http(5).unwrap();
        let list = vec![format!("{}/b", base), format!("{}/a", base)];
        let pages = fetch_all(&source, &list, 1).await.unwrap();
        let htmls: Vec<&str> = pages.iter().map(|p| p.html.as_str()).collect();
        assert_eq!(htmls, vec!["<p>/b</p>", "<p>/a</p>"]);
    }

    #[tokio::test]
    async fn http_error_status_aborts() {
        let base = serve_pages().await;
        let source = Source::http(5).unwrap();
        let list = vec![
            format!("{}/ok", base),
            format!("{}/missing", base),
            format!("{}/later", base),
        ];
        let err = fetch_all(&source, &list, 1).await.unwrap_err();
        match err.downcast_ref::<FetchError>() {
            Some(FetchError::Status { url, status }) => {
                assert!(url.ends_with("/missing"));
                assert_eq!(*status, reqwest::StatusCode::NOT_FOUND);
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_request_error() {
        // Bind then drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = Source::http(5).unwrap();
        let err = fetch_all(&source, &[format!("http://{}/x", addr)], 1)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FetchError>(),
            Some(FetchError::Request { .. })
        ));
    }

    #[tokio::test]
    async fn empty_list() {
        let source = Source::dir("does-not-matter");
        assert!(fetch_all(&source, &[], 1).await.unwrap().is_empty());
    }

    #[test]
    fn http_source_builds_with_and_without_timeout() {
        assert!(matches!(Source::http(5).unwrap(), Source::Http(_)));
        assert!(matches!(Source::http(0).unwrap(), Source::Http(_)));
    }
}
