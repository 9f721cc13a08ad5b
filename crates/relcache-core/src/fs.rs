use std::{ffi::OsString, path::Path};

use serde::{de::DeserializeOwned, Serialize};
use tokio::io::AsyncWriteExt;

use crate::{error::FetchError, PARTIAL_SUFFIX};

pub async fn write_toml_config<T>(data: &T, path: impl AsRef<Path>) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
{
    let path = path.as_ref();
    let body = toml::to_string_pretty(data)?;
    write_to_file(body.as_bytes(), path).await?;

    tracing::info!(
        "Config {} has been created successfully",
        path.to_string_lossy()
    );

    Ok(())
}

pub async fn read_toml_config<T>(path: impl AsRef<Path>) -> anyhow::Result<T>
where
    T: DeserializeOwned + ?Sized,
{
    let path = path.as_ref();

    let string = tokio::fs::read_to_string(&path).await?;
    let body: T = toml::from_str(&string)?;

    tracing::info!(
        "Config {} has been read successfully",
        path.to_string_lossy()
    );

    Ok(body)
}

pub async fn write_to_file(data: &[u8], path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }
    let mut file = tokio::fs::File::create(&path).await?;

    file.write_all(data).await?;

    Ok(())
}

/// Length of the file at `path`, or `None` if there's no file.
pub async fn file_len(path: impl AsRef<Path>) -> Result<Option<u64>, FetchError> {
    let path = path.as_ref();
    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => Ok(Some(metadata.len())),
        Ok(_) => Ok(None),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(FetchError::filesystem(path, err)),
    }
}

/// Writes `data` to a fresh temporary file next to `path` and then renames it over `path`.
///
/// Every call gets its own temporary file, so concurrent writers never share one.
pub async fn write_replacing(data: &[u8], path: impl AsRef<Path>) -> Result<(), FetchError> {
    let path = path.as_ref();
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|err| FetchError::filesystem(dir, err))?;

    let mut prefix = path.file_name().map(OsString::from).unwrap_or_default();
    prefix.push(".");

    let write = async {
        let (file, partial) = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(PARTIAL_SUFFIX)
            .tempfile_in(dir)?
            .into_parts();

        let mut file = tokio::fs::File::from_std(file);
        file.write_all(data).await?;
        file.sync_all().await?;
        drop(file);

        // Dropping `partial` on any earlier error removes the temporary file.
        partial.persist(path).map_err(|err| err.error)
    };

    write.await.map_err(|err| FetchError::filesystem(path, err))
}
