//! albumfs command-line client.
//!
//! Usage:
//!   # List every album, with photo counts
//!   albumfs ls -l album
//!
//!   # Upload into an album (create it first)
//!   albumfs mkdir album/Vacation
//!   albumfs put ./img1.jpg album/Vacation/img1.jpg
//!
//!   # Work below a root, against a throwaway store
//!   albumfs --root album --memory ls
//!
//!   # Show the routing table
//!   albumfs routes

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use albumfs_core::{
    AlbumFsConfig, DirEntry, FileAttr, FileType, OpenedRoot, PatternTable, PhotoBackend,
    StoreConfig, VfsOps,
};

/// Browse and edit photo collections as a filesystem.
#[derive(Parser, Debug)]
#[command(name = "albumfs")]
#[command(about = "Photo albums and playlists as a filesystem")]
struct Args {
    /// Config file (RON). Defaults to the user config dir.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Virtual root, e.g. `album` or `album/Vacation`
    #[arg(long)]
    root: Option<String>,

    /// Directory holding the photo store
    #[arg(long, conflicts_with = "memory")]
    data_dir: Option<PathBuf>,

    /// Use an ephemeral in-memory store
    #[arg(long)]
    memory: bool,

    /// Refuse every write
    #[arg(long)]
    read_only: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a directory
    Ls {
        /// Show size, photo count or mime type, and remote id
        #[arg(short, long)]
        long: bool,
        #[arg(default_value = "")]
        path: String,
    },
    /// Show attributes of a path
    Stat {
        #[arg(default_value = "")]
        path: String,
    },
    /// Create a collection
    Mkdir { path: String },
    /// Delete an empty collection
    Rmdir { path: String },
    /// Write a photo's content to stdout
    Cat {
        #[arg(default_value = "")]
        path: String,
    },
    /// Upload a local file
    Put { local: PathBuf, path: String },
    /// Delete a photo
    Rm { path: String },
    /// Print the routing table
    Routes,
}

impl Args {
    /// Config file overlaid with command-line flags.
    fn config(&self) -> Result<AlbumFsConfig> {
        let mut config = AlbumFsConfig::load_or_default(self.config.as_deref())
            .context("loading config")?;
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(path) = &self.data_dir {
            config.store = StoreConfig::Directory { path: path.clone() };
        }
        if self.memory {
            config.store = StoreConfig::Memory;
        }
        config.read_only |= self.read_only;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so `cat` output stays clean.
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let table = Arc::new(PatternTable::builtin());

    if let Command::Routes = args.command {
        print_routes(&table);
        return Ok(());
    }

    let config = args.config()?;
    tracing::debug!(root = %config.root, store = ?config.store, "starting");
    let backend = config.build_backend(table, config.build_service());

    // A root naming a photo leaves the backend at its collection; an empty
    // path then means the photo itself.
    let (fs, leaf) = match backend.open().await {
        OpenedRoot::Directory(fs) => (fs, None),
        OpenedRoot::File { backend, leaf } => (backend, Some(leaf)),
    };

    run(&fs, leaf.as_deref(), args.command).await
}

async fn run(fs: &PhotoBackend, leaf: Option<&str>, command: Command) -> Result<()> {
    let target = |path: &str| -> PathBuf {
        match (path.is_empty(), leaf) {
            (true, Some(leaf)) => PathBuf::from(leaf),
            _ => PathBuf::from(path),
        }
    };

    match command {
        Command::Ls { long, path } => {
            let path = target(&path);
            let attr = fs.getattr(&path).await.with_context(|| display(&path))?;
            if attr.is_file() {
                if long {
                    println!("{}", long_line(&path.display().to_string(), &attr));
                } else {
                    println!("{}", path.display());
                }
                return Ok(());
            }
            if long {
                let entries = fs.readdir_attrs(&path).await.with_context(|| display(&path))?;
                for (entry, attr) in entries {
                    println!("{}", long_line(&entry_name(&entry), &attr));
                }
            } else {
                for entry in fs.readdir(&path).await.with_context(|| display(&path))? {
                    println!("{}", entry_name(&entry));
                }
            }
        }
        Command::Stat { path } => {
            let path = target(&path);
            let attr = fs.getattr(&path).await.with_context(|| display(&path))?;
            let kind = if attr.is_dir() { "directory" } else { "file" };
            println!("path:  {}", path.display());
            println!("type:  {kind}");
            println!("size:  {}", attr.size);
            println!("perm:  {:o}", attr.perm);
            if let Some(id) = &attr.id {
                println!("id:    {id}");
            }
            if let Some(mime) = &attr.mime_type {
                println!("mime:  {mime}");
            }
        }
        Command::Mkdir { path } => {
            let path = PathBuf::from(path);
            fs.mkdir(&path).await.with_context(|| display(&path))?;
        }
        Command::Rmdir { path } => {
            let path = PathBuf::from(path);
            fs.rmdir(&path).await.with_context(|| display(&path))?;
        }
        Command::Cat { path } => {
            let path = target(&path);
            let data = fs.read_all(&path).await.with_context(|| display(&path))?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&data)?;
            stdout.flush()?;
        }
        Command::Put { local, path } => {
            let data = tokio::fs::read(&local)
                .await
                .with_context(|| format!("reading {}", local.display()))?;
            let path = PathBuf::from(path);
            let attr = fs.put(&path, &data).await.with_context(|| display(&path))?;
            println!("{} ({} bytes)", path.display(), attr.size);
        }
        Command::Rm { path } => {
            let path = target(&path);
            fs.unlink(&path).await.with_context(|| display(&path))?;
        }
        Command::Routes => print_routes(fs.table()),
    }
    Ok(())
}

fn print_routes(table: &PatternTable) {
    println!("{:<28} {:<10} {:<9} {:<5} {:<6} mkdir", "pattern", "role", "kind", "style", "upload");
    for rule in table.rules() {
        let kind = rule.collection_kind().map(|k| k.as_str()).unwrap_or("-");
        let style = if rule.applies_to_files() { "file" } else { "dir" };
        println!(
            "{:<28} {:<10} {:<9} {:<5} {:<6} {}",
            rule.pattern(),
            rule.role().as_str(),
            kind,
            style,
            yes_no(rule.can_upload()),
            yes_no(rule.can_create_collection()),
        );
    }
}

fn entry_name(entry: &DirEntry) -> String {
    match entry.kind {
        FileType::Directory => format!("{}/", entry.name),
        FileType::File => entry.name.clone(),
    }
}

/// `ls -l` row: type, size, photo count or mime type, remote id, name.
fn long_line(name: &str, attr: &FileAttr) -> String {
    let kind = if attr.is_dir() { 'd' } else { '-' };
    let detail = match (&attr.items, &attr.mime_type) {
        (Some(items), _) => format!("{items} items"),
        (None, Some(mime)) => mime.clone(),
        (None, None) => "-".to_string(),
    };
    let id = attr.id.as_deref().unwrap_or("-");
    format!("{kind} {:>10} {detail:<12} {id:<36} {name}", attr.size)
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn display(path: &Path) -> String {
    if path.as_os_str().is_empty() {
        "/".to_string()
    } else {
        path.display().to_string()
    }
}
