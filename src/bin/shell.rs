//! cordkv interactive shell
//!
//! Line-oriented query shell over a single store file.

use std::io::{BufRead, Write};

use clap::Parser;
use cordkv::shell::{Reply, Session, TextStore};
use cordkv::{Config, SyncStrategy};
use tracing_subscriber::{fmt, EnvFilter};

/// cordkv shell
#[derive(Parser, Debug)]
#[command(name = "cordkv-shell")]
#[command(about = "Interactive shell for the cordkv key-value store")]
#[command(version)]
struct Args {
    /// Path to the database file (created if it does not exist)
    path: String,

    /// fsync after every append instead of only at commit
    #[arg(long)]
    sync_every_append: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cordkv=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let sync_strategy = if args.sync_every_append {
        SyncStrategy::EveryAppend
    } else {
        SyncStrategy::OnCommit
    };
    let config = Config::builder()
        .path(&args.path)
        .sync_strategy(sync_strategy)
        .build();

    let store = match TextStore::open(config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("failed to open {}: {}", args.path, e);
            std::process::exit(1);
        }
    };

    tracing::info!("cordkv v{} on {}", cordkv::VERSION, args.path);

    let mut session = Session::new(store);
    println!("Use Ctrl-D or 'exit' to leave; changes persist only after 'commit'.");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut line = String::new();

    loop {
        print!("[cordkv]=> ");
        let _ = stdout.flush();

        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // Ctrl-D
            Ok(_) => {}
            Err(e) => {
                tracing::error!("failed to read input: {}", e);
                break;
            }
        }
        if line.trim().is_empty() {
            continue;
        }

        match session.execute(&line) {
            Reply::Output(output) => println!("{}", output),
            Reply::Exit => break,
        }
    }

    if session.store().is_dirty() {
        eprintln!("warning: uncommitted changes discarded (run 'commit' to keep them)");
    }
}
