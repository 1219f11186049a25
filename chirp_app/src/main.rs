mod app;
mod command;
mod config;

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use chirp_core::fetch::{FetchOutcome, FetchTask};
use chirp_core::schedule::Debouncer;
use chirp_core::source::PostSource;
use posts_client::PostsClient;

use crate::{app::App, command::Command, config::Config};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // 1. Initialize logger
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?
        .add_directive("hyper::proto=info".parse()?)
        .add_directive("hyper::client=info".parse()?)
        .add_directive("reqwest=info".parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    // 2. Initialize client
    let config = Config::from_env()?;
    let source: Arc<dyn PostSource> = Arc::new(PostsClient::new(&config.api_base_url)?);
    tracing::info!("Using posts API at {}", config.api_base_url);

    // 3. Initialize screens
    let (search_sender, mut search_receiver) = mpsc::unbounded_channel();
    let (outcome_sender, mut outcome_receiver) = mpsc::unbounded_channel();
    let mut app = App::new(&config, Debouncer::new(config.search_debounce, search_sender));

    // 4. Read commands
    let (line_sender, mut line_receiver) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line_sender.send(line).is_err() {
                break;
            }
        }
    });

    spawn_fetches(&source, &outcome_sender, app.start());
    app.sync();
    show(&mut app);

    loop {
        tokio::select! {
            line = line_receiver.recv() => {
                let Some(line) = line else { break };
                if line.trim().is_empty() {
                    prompt(&app);
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => println!("{}", command::HELP),
                    Ok(command) => match app.handle(command, Utc::now()) {
                        Ok(tasks) => spawn_fetches(&source, &outcome_sender, tasks),
                        Err(e) => println!("{}", e),
                    },
                    Err(e) => println!("{}", e),
                }
            }
            Some(settled) = search_receiver.recv() => {
                spawn_fetches(&source, &outcome_sender, app.on_search_settled(settled));
            }
            Some(outcome) = outcome_receiver.recv() => {
                if !app.apply(outcome) {
                    continue;
                }
            }
        }
        app.sync();
        show(&mut app);
    }

    tracing::info!("Bye");
    Ok(())
}

fn spawn_fetches(source: &Arc<dyn PostSource>, sender: &mpsc::UnboundedSender<FetchOutcome>, tasks: Vec<FetchTask>) {
    for task in tasks {
        let source = source.clone();
        let sender = sender.clone();
        tokio::spawn(async move {
            let outcome = task.run(source.as_ref()).await;
            sender.send(outcome).ok();
        });
    }
}

fn show(app: &mut App) {
    if let Some(alert) = app.take_alert() {
        println!("!! {}", alert);
    }
    println!("{}", app.render());
    prompt(app);
}

fn prompt(app: &App) {
    print!("{}> ", app.current());
    std::io::stdout().flush().ok();
}
