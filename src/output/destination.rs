//! Table destinations (local filesystem, S3, R2, GCS, Azure)

use crate::error::{Error, Result};
use crate::types::Table;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectMeta, ObjectStore};
use std::fmt;
use std::sync::Arc;

/// Relative path of a table part file
///
/// Format: `{table}/part-{NNNNN}.{ext}`
///
/// Examples:
/// - `deliveries/part-00000.parquet`
/// - `players/part-00000.jsonl`
pub fn part_path(table: Table, part: usize, extension: &str) -> String {
    format!("{}/part-{part:05}.{extension}", table.name())
}

/// Storage backend of a destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    File,
    S3,
    R2,
    Gcs,
    Azure,
}

impl Scheme {
    /// Detect the scheme of a destination URL; plain paths are local
    pub fn detect(url: &str) -> Self {
        match url.split_once("://").map(|(scheme, _)| scheme) {
            Some("s3") => Scheme::S3,
            Some("r2") => Scheme::R2,
            Some("gs") => Scheme::Gcs,
            Some("az") => Scheme::Azure,
            _ => Scheme::File,
        }
    }

    /// URL prefix used in log output
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::File => "file",
            Scheme::S3 => "s3",
            Scheme::R2 => "r2",
            Scheme::Gcs => "gs",
            Scheme::Azure => "az",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split `scheme://bucket/some/prefix` into bucket and prefix
fn split_bucket(url: &str, scheme: Scheme) -> Result<(String, String)> {
    let rest = url
        .strip_prefix(&format!("{scheme}://"))
        .filter(|r| !r.is_empty())
        .ok_or_else(|| Error::config(format!("Invalid {scheme} URL: {url}")))?;

    Ok(match rest.split_once('/') {
        Some((bucket, prefix)) => (bucket.to_string(), prefix.trim_matches('/').to_string()),
        None => (rest.to_string(), String::new()),
    })
}

/// Where table part files are written
#[derive(Debug, Clone)]
pub struct Destination {
    store: Arc<dyn ObjectStore>,
    /// Path prefix within the bucket/container
    prefix: String,
    scheme: Scheme,
}

impl Destination {
    /// Parse a destination URL and create the matching object store
    ///
    /// Supported formats:
    /// - `s3://bucket/path/` - AWS S3 (credentials from `AWS_*` env vars)
    /// - `r2://bucket/path/` - Cloudflare R2, endpoint from `R2_ENDPOINT_URL`
    /// - `gs://bucket/path/` - Google Cloud Storage
    /// - `az://container/path/` - Azure Blob Storage
    /// - `/local/path/`, `./path/` or `file:///path` - local filesystem
    pub fn parse(url: &str) -> Result<Self> {
        let scheme = Scheme::detect(url);
        let (store, prefix): (Arc<dyn ObjectStore>, String) = match scheme {
            Scheme::File => (Self::local_store(url)?, String::new()),
            Scheme::S3 | Scheme::R2 => {
                let (bucket, prefix) = split_bucket(url, scheme)?;
                let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
                if scheme == Scheme::R2 {
                    if let Ok(endpoint) = std::env::var("R2_ENDPOINT_URL") {
                        builder = builder.with_endpoint(endpoint);
                    }
                }
                let store = builder
                    .build()
                    .map_err(|e| Error::config(format!("Failed to create {scheme} client: {e}")))?;
                (Arc::new(store), prefix)
            }
            Scheme::Gcs => {
                let (bucket, prefix) = split_bucket(url, scheme)?;
                let store = GoogleCloudStorageBuilder::from_env()
                    .with_bucket_name(bucket)
                    .build()
                    .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;
                (Arc::new(store), prefix)
            }
            Scheme::Azure => {
                let (container, prefix) = split_bucket(url, scheme)?;
                let store = MicrosoftAzureBuilder::from_env()
                    .with_container_name(container)
                    .build()
                    .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?;
                (Arc::new(store), prefix)
            }
        };

        Ok(Self {
            store,
            prefix,
            scheme,
        })
    }

    /// Local directory store, creating the directory if needed
    fn local_store(url: &str) -> Result<Arc<dyn ObjectStore>> {
        let path = url.strip_prefix("file://").unwrap_or(url);

        std::fs::create_dir_all(path)
            .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?;

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;
        Ok(Arc::new(store))
    }

    /// Check if this is a cloud destination (not local)
    pub fn is_cloud(&self) -> bool {
        self.scheme != Scheme::File
    }

    /// Storage backend
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Location of a relative path under the destination prefix
    fn object_path(&self, relative: &str) -> ObjectPath {
        if self.prefix.is_empty() {
            ObjectPath::from(relative)
        } else {
            ObjectPath::from(format!("{}/{relative}", self.prefix))
        }
    }

    /// Write bytes to a relative path in the destination
    pub async fn write(&self, relative: &str, data: Bytes) -> Result<String> {
        let path = self.object_path(relative);

        self.store
            .put(&path, data.into())
            .await
            .map_err(|e| Error::output(format!("Failed to write {path}: {e}")))?;

        Ok(format!("{}://{path}", self.scheme))
    }

    /// Delete every object under a relative directory, returning how many went
    ///
    /// A directory that does not exist yet has nothing to delete.
    pub async fn clear(&self, relative_dir: &str) -> Result<usize> {
        let dir = self.object_path(relative_dir);

        let listed = match self.store.list(Some(&dir)).try_collect::<Vec<ObjectMeta>>().await {
            Ok(listed) => listed,
            Err(object_store::Error::NotFound { .. }) => Vec::new(),
            Err(e) => return Err(Error::output(format!("Failed to list {dir}: {e}"))),
        };

        for meta in &listed {
            match self.store.delete(&meta.location).await {
                Ok(()) | Err(object_store::Error::NotFound { .. }) => {}
                Err(e) => {
                    return Err(Error::output(format!(
                        "Failed to delete {}: {e}",
                        meta.location
                    )));
                }
            }
        }

        Ok(listed.len())
    }

    /// Delete the existing parts of a table
    pub async fn clear_table(&self, table: Table) -> Result<usize> {
        self.clear(table.name()).await
    }

    /// Write one part of a table
    pub async fn write_part(
        &self,
        table: Table,
        part: usize,
        extension: &str,
        data: Bytes,
    ) -> Result<String> {
        self.write(&part_path(table, part, extension), data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_detect() {
        assert_eq!(Scheme::detect("s3://bucket/x"), Scheme::S3);
        assert_eq!(Scheme::detect("r2://bucket"), Scheme::R2);
        assert_eq!(Scheme::detect("gs://bucket/x"), Scheme::Gcs);
        assert_eq!(Scheme::detect("az://container/x"), Scheme::Azure);
        assert_eq!(Scheme::detect("./out"), Scheme::File);
        assert_eq!(Scheme::detect("file:///tmp/out"), Scheme::File);
    }

    #[test]
    fn test_split_bucket() {
        assert_eq!(
            split_bucket("s3://my-bucket/path/to/data/", Scheme::S3).unwrap(),
            ("my-bucket".to_string(), "path/to/data".to_string())
        );
        assert_eq!(
            split_bucket("gs://only-bucket", Scheme::Gcs).unwrap(),
            ("only-bucket".to_string(), String::new())
        );
        assert!(split_bucket("s3://", Scheme::S3).is_err());
    }

    #[test]
    fn test_part_path() {
        assert_eq!(
            part_path(Table::Deliveries, 3, "parquet"),
            "deliveries/part-00003.parquet"
        );
        assert_eq!(part_path(Table::Players, 0, "jsonl"), "players/part-00000.jsonl");
    }

    #[test]
    fn test_parse_local_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("tables");
        let dest = Destination::parse(path.to_str().unwrap()).unwrap();
        assert_eq!(dest.scheme(), Scheme::File);
        assert!(!dest.is_cloud());
        assert!(path.is_dir());
    }

    #[tokio::test]
    async fn test_write_part_local() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dest = Destination::parse(temp_dir.path().to_str().unwrap()).unwrap();

        let written = dest
            .write_part(Table::Matches, 0, "jsonl", Bytes::from_static(b"{}\n"))
            .await
            .unwrap();
        assert_eq!(written, "file://matches/part-00000.jsonl");

        let on_disk =
            std::fs::read_to_string(temp_dir.path().join("matches/part-00000.jsonl")).unwrap();
        assert_eq!(on_disk, "{}\n");
    }

    #[tokio::test]
    async fn test_clear_table_removes_only_that_table() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dest = Destination::parse(temp_dir.path().to_str().unwrap()).unwrap();

        for part in 0..3 {
            dest.write_part(Table::Matches, part, "parquet", Bytes::from_static(b"x"))
                .await
                .unwrap();
        }
        dest.write_part(Table::Innings, 0, "parquet", Bytes::from_static(b"x"))
            .await
            .unwrap();

        assert_eq!(dest.clear_table(Table::Matches).await.unwrap(), 3);
        assert!(!temp_dir.path().join("matches/part-00000.parquet").exists());
        assert!(temp_dir.path().join("innings/part-00000.parquet").exists());

        // Nothing left, and a table never written is fine too
        assert_eq!(dest.clear_table(Table::Matches).await.unwrap(), 0);
        assert_eq!(dest.clear_table(Table::Players).await.unwrap(), 0);
    }
}
