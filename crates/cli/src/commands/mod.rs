use std::path::Path;

use futures_util::StreamExt;
use relcache_core::{
    fs::{read_toml_config, write_toml_config},
    paths::CacheDir,
    format::human_readable_size,
    CacheOutcome, Fetcher, HttpTransport, ToolDescriptor,
};
use tracing::{error, info, warn};

use crate::{
    args::{Cli, Command},
    error::Error,
    settings::Settings,
};

pub async fn process_args(args: &Cli) -> anyhow::Result<()> {
    match &args.command {
        Command::Init { force } => init(&args.config, *force).await,
        Command::List => list(&read_settings(&args.config).await?),
        Command::Fetch { name } => {
            let settings = read_settings(&args.config).await?;
            let tool = settings
                .find_tool(name)
                .cloned()
                .ok_or_else(|| Error::UnknownTool(name.clone()))?;

            let fetcher = fetcher(&settings, args.cache_dir.as_deref())?;
            fetch(&fetcher, tool).await
        }
        Command::FetchAll => {
            let settings = read_settings(&args.config).await?;
            let fetcher = fetcher(&settings, args.cache_dir.as_deref())?;
            fetch_all(&fetcher, &settings.tools).await
        }
    }
}

async fn read_settings(path: &Path) -> anyhow::Result<Settings> {
    if !path.exists() {
        return Err(Error::General(format!(
            "`{}` not found\nRun `init` before",
            path.display()
        ))
        .into());
    }

    read_toml_config(path).await
}

fn fetcher(settings: &Settings, cache_dir: Option<&Path>) -> anyhow::Result<Fetcher> {
    let mut transport = HttpTransport::with_user_agent(settings.user_agent.as_deref())?;
    if let Some(timeout) = settings.feed_timeout() {
        transport = transport.feed_timeout(timeout);
    }

    let dir = cache_dir.map_or_else(|| settings.cache_dir.clone(), Path::to_path_buf);
    let dir = match dir.is_absolute() {
        true => CacheDir::new(dir),
        false => {
            warn!("`cache_dir` is not absolute. Adding to the current dir");
            CacheDir::new(dir).make_absolute()?
        }
    };

    Ok(Fetcher::new(transport, dir))
}

pub async fn init(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        return Err(Error::General(format!(
            "`{}` already exists\nPass `--force` to overwrite it",
            path.display()
        ))
        .into());
    }

    write_toml_config(&Settings::default(), path).await
}

pub fn list(settings: &Settings) -> anyhow::Result<()> {
    if settings.tools.is_empty() {
        println!("No tools configured");
    }

    for tool in &settings.tools {
        println!("{}: v{}.x ({})", tool.name, tool.major_version, tool.release_url);
    }

    Ok(())
}

pub async fn fetch(fetcher: &Fetcher, tool: ToolDescriptor) -> anyhow::Result<()> {
    let name = tool.name.clone();
    let mut stream = fetcher.fetch_and_cache(tool);

    while let Some(item) = stream.next().await {
        println!("{}", item?);
    }

    if let Some(outcome) = stream.outcome() {
        println!("{}", describe(&name, outcome));
    }

    Ok(())
}

pub async fn fetch_all(fetcher: &Fetcher, tools: &[ToolDescriptor]) -> anyhow::Result<()> {
    let mut failed = 0;

    for tool in tools {
        let name = tool.name.clone();
        if let Err(err) = fetch(fetcher, tool.clone()).await {
            error!(tool = %name, "Failed to fetch: {err:#}");
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(Error::SomeFailed {
            failed,
            total: tools.len(),
        }
        .into());
    }

    info!("All {} tools are cached", tools.len());

    Ok(())
}

fn describe(name: &str, outcome: &CacheOutcome) -> String {
    let path = outcome.path().display();
    match outcome {
        CacheOutcome::Cached { version, .. } => format!("{name} {version} is already cached at {path}"),
        CacheOutcome::Downloaded { version, size, .. } => {
            format!("{name} {version} ({}) saved to {path}", human_readable_size(*size))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn describe_test() {
        let outcome = CacheOutcome::Downloaded {
            path: PathBuf::from("/cache/tool.zip"),
            version: "1.2.3".parse().unwrap(),
            size: 2_500_000,
        };
        assert_eq!(describe("Koala", &outcome), "Koala 1.2.3 (2.5 MB) saved to /cache/tool.zip");
    }

    #[tokio::test]
    async fn init_test() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Settings.toml");

        init(&path, false).await.unwrap();
        assert!(init(&path, false).await.is_err());
        init(&path, true).await.unwrap();

        let settings = read_settings(&path).await.unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn missing_settings_test() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_settings(&dir.path().join("missing.toml")).await.is_err());
    }
}
