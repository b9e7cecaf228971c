//! vecstash command-line tool
//!
//! Works on a snapshot directly, without a running server. Do not point it at
//! a snapshot a live server is using.
//!
//! Usage:
//!   vecstash-cli --root ./data add doc-1 "cats and dogs" --meta lang=en
//!   vecstash-cli --root ./data query "feline pets" --top-k 3
//!   vecstash-cli --root ./data import docs.json

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vecstash::config::StorageConfig;
use vecstash::defaults::{
    DEFAULT_EMBEDDINGS_PATH, DEFAULT_SNAPSHOT_FILE, DEFAULT_STORAGE_ROOT, DEFAULT_TOP_K,
};
use vecstash::{BatchItem, BatchResult, Metadata, VectorStore, WordVectors};

#[derive(Parser)]
#[command(name = "vecstash-cli")]
#[command(about = "Inspect and edit a vecstash snapshot")]
#[command(version)]
struct Args {
    /// Directory holding the snapshot
    #[arg(long, default_value = DEFAULT_STORAGE_ROOT)]
    root: PathBuf,

    /// Snapshot file name inside the root
    #[arg(long, default_value = DEFAULT_SNAPSHOT_FILE)]
    file: String,

    /// Word-vector table used to embed text
    #[arg(long, default_value = DEFAULT_EMBEDDINGS_PATH)]
    embeddings: PathBuf,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the number of records
    Count,
    /// Print one record as JSON
    Get { id: String },
    /// Embed and store a text
    Add {
        id: String,
        text: String,
        /// Metadata entry, repeatable
        #[arg(long = "meta", value_parser = parse_meta)]
        meta: Vec<(String, String)>,
    },
    /// Rank stored records against a text
    Query {
        text: String,
        #[arg(long, short = 'k', default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
    /// Remove one record
    Remove { id: String },
    /// Remove every record
    Clear,
    /// Batch-add a JSON array of {id, text, metadata} items
    Import { path: PathBuf },
}

fn parse_meta(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", raw))
}

/// Batch-add the JSON array of items in `path`
async fn import_file(store: &VectorStore, path: &Path) -> anyhow::Result<BatchResult> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let items: Vec<BatchItem> =
        serde_json::from_slice(&data).with_context(|| format!("parsing {}", path.display()))?;

    Ok(store.batch_upsert_texts(items).await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!("vecstash={}", log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let storage = StorageConfig {
        root: args.root.clone(),
        snapshot_file: args.file.clone(),
        simulate_latency: false,
    };
    let backend = Arc::new(storage.create_backend()?);
    let embedder = Arc::new(
        WordVectors::open(&args.embeddings)
            .await
            .with_context(|| format!("loading {}", args.embeddings.display()))?,
    );
    let store = VectorStore::open(embedder, backend, args.file.clone()).await?;

    match args.command {
        Command::Count => println!("{}", store.count().await),
        Command::Get { id } => match store.get(&id).await {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => anyhow::bail!("no record with id `{}`", id),
        },
        Command::Add { id, text, meta } => {
            let metadata: Metadata = meta.into_iter().collect();
            store.upsert_text(id.clone(), text, metadata).await?;
            println!("stored {}", id);
        }
        Command::Query { text, top_k } => {
            for hit in store.query_text(&text, top_k).await {
                println!("{:.4}\t{}\t{}", hit.score, hit.id, hit.text);
            }
        }
        Command::Remove { id } => {
            if store.remove_at(&id).await? {
                println!("removed {}", id);
            } else {
                anyhow::bail!("no record with id `{}`", id);
            }
        }
        Command::Clear => {
            store.remove_all().await?;
            println!("cleared");
        }
        Command::Import { path } => {
            let result = import_file(&store, &path).await?;
            println!("imported {} ({} failed)", result.successful, result.failed);
            for error in &result.errors {
                eprintln!("  {}", error);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecstash::storage::local::{LocalStorage, LocalStorageConfig};

    async fn open_store(dir: &tempfile::TempDir) -> VectorStore {
        let embedder = Arc::new(WordVectors::parse("cats 1 0\ncar 0 1\n").unwrap());
        let storage = Arc::new(LocalStorage::new(dir.path(), LocalStorageConfig::fast()).unwrap());
        VectorStore::open(embedder, storage, DEFAULT_SNAPSHOT_FILE)
            .await
            .unwrap()
    }

    #[test]
    fn test_parse_meta() {
        assert_eq!(parse_meta("lang=en").unwrap(), ("lang".into(), "en".into()));
        // Only the first `=` splits
        assert_eq!(parse_meta("q=a=b").unwrap(), ("q".into(), "a=b".into()));
        assert_eq!(parse_meta("empty=").unwrap(), ("empty".into(), String::new()));

        let err = parse_meta("novalue").unwrap_err();
        assert!(err.contains("KEY=VALUE"));
    }

    #[test]
    fn test_args_parse() {
        let argv = [
            "vecstash-cli", "--root", "/tmp/x", "add", "doc-1", "cats", "--meta", "lang=en",
        ];
        let args = Args::try_parse_from(argv).unwrap();
        assert_eq!(args.root, PathBuf::from("/tmp/x"));
        match args.command {
            Command::Add { id, text, meta } => {
                assert_eq!(id, "doc-1");
                assert_eq!(text, "cats");
                assert_eq!(meta, vec![("lang".to_string(), "en".to_string())]);
            }
            _ => panic!("expected add"),
        }

        let bad_meta = ["vecstash-cli", "add", "doc-1", "cats", "--meta", "x"];
        assert!(Args::try_parse_from(bad_meta).is_err());
    }

    #[tokio::test]
    async fn test_import_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;

        let path = dir.path().join("docs.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "a", "text": "cats", "metadata": {"lang": "en"}},
                {"id": "b", "text": "car"},
                {"id": "", "text": "dropped"}
            ]"#,
        )
        .unwrap();

        let result = import_file(&store, &path).await.unwrap();
        assert_eq!(result.successful, 2);
        assert_eq!(result.failed, 1);
        assert_eq!(store.count().await, 2);
        assert_eq!(store.get("a").await.unwrap().metadata["lang"], "en");
        assert_eq!(store.query_text("car", 1).await[0].id, "b");
    }

    #[tokio::test]
    async fn test_import_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;

        let path = dir.path().join("docs.json");
        std::fs::write(&path, "{\"id\": \"a\"}").unwrap();
        assert!(import_file(&store, &path).await.is_err());

        assert!(import_file(&store, &dir.path().join("missing.json")).await.is_err());
        assert!(store.is_empty().await);
    }
}
