//! Interactive tutoring front-end.
//!
//! Thin glue over the core pipeline: reads lines from the terminal,
//! dispatches the closed command set, and renders replies. Contains no
//! scoring logic.
//!
//! # Environment Variables
//!
//! - `EDUMENTOR_DB` — session database path (default: platform data dir)
//! - `RUST_LOG` — log filter (default: warn)
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin edumentor
//! ```

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use edumentor::{
    KnowledgeBase, SessionStore, Settings, SqliteSessionStorage, Tier, TurnEngine,
};

/// The closed set of front-end commands.
enum Command {
    Help,
    Stats,
    Topics,
    Reset,
    Quit,
    Say(String),
}

impl Command {
    fn parse(input: &str) -> Command {
        match input.to_lowercase().as_str() {
            "help" => Command::Help,
            "stats" => Command::Stats,
            "topics" => Command::Topics,
            "reset" => Command::Reset,
            "quit" | "exit" | "bye" => Command::Quit,
            _ => Command::Say(input.to_string()),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let settings = Settings::from_env();
    let store = match SqliteSessionStorage::new(Some(settings.db_path.clone())) {
        Ok(backend) => Arc::new(SessionStore::new(Box::new(backend))),
        Err(e) => {
            log::warn!("Falling back to in-memory sessions: {}", e);
            Arc::new(SessionStore::in_memory())
        }
    };
    let engine = TurnEngine::new(settings, store.clone(), Arc::new(KnowledgeBase::default()));

    println!("{}", "=".repeat(60));
    println!("Welcome to edumentor!");
    println!("I adapt my explanations to how you write.");
    println!("Type 'help' for commands, 'quit' to leave.");
    println!("{}", "=".repeat(60));

    let name = prompt("What's your name? ");
    let name = if name.trim().is_empty() {
        "Student".to_string()
    } else {
        name.trim().to_string()
    };

    let session_id = store.create_or_resume(&name);
    println!("\nHello {name}! Let's start learning together.");
    if let Ok(record) = store.load(&session_id) {
        if record.interaction_count > 0 {
            println!(
                "Welcome back! We've had {} interactions before.",
                record.interaction_count
            );
        }
    }

    let stdin = io::stdin();
    loop {
        print!("\n{name}: ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            println!("Please say something! I'm here to help you learn.");
            continue;
        }

        match Command::parse(input) {
            Command::Help => show_help(),
            Command::Stats => show_stats(&store, &session_id),
            Command::Topics => show_topics(&store, &session_id),
            Command::Reset => {
                if store.reset(&session_id).is_ok() {
                    println!("Session reset! Let's start fresh.");
                }
            }
            Command::Quit => break,
            Command::Say(text) => match engine.run_turn(session_id, &text) {
                Ok(reply) => println!("\nTutor: {}", reply.text),
                Err(e) => {
                    log::error!("Turn failed: {}", e);
                    println!("Sorry, I ran into a problem. Please try again.");
                }
            },
        }
    }

    println!("\nGoodbye, {name}! Keep learning and stay curious.");
    show_stats(&store, &session_id);
    if let Err(e) = store.end_session(&session_id) {
        log::error!("Failed to save session: {}", e);
    }
}

fn prompt(message: &str) -> String {
    print!("{message}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
    line
}

fn show_help() {
    println!("\nAvailable commands:");
    println!("  help   - show this message");
    println!("  stats  - show your learning statistics");
    println!("  topics - show recently discussed topics");
    println!("  reset  - reset your session data");
    println!("  quit   - end the conversation");
    println!("\nAsk about any topic; I'll adapt to your level as we go.");
}

fn show_stats(store: &SessionStore, session_id: &uuid::Uuid) {
    let record = match store.load(session_id) {
        Ok(record) => record,
        Err(_) => return,
    };
    let tier = Tier::from_level(
        record.estimate.level,
        &Settings::default().tier_thresholds,
    );
    println!("\nYour learning statistics:");
    println!("  Interactions: {}", record.interaction_count);
    if record.estimate.sample_count > 0 {
        println!(
            "  Level: {:.2}/10 ({:?}, confidence {:.0}%)",
            record.estimate.level,
            tier,
            record.estimate.confidence * 100.0
        );
    } else {
        println!("  Level: not assessed yet");
    }
    println!("  Average vocabulary score: {:.2}/10", record.avg_vocabulary);
    println!("  Average complexity score: {:.2}/10", record.avg_complexity);
    println!("  Topics discussed: {}", record.topics.len());
}

fn show_topics(store: &SessionStore, session_id: &uuid::Uuid) {
    match store.load(session_id) {
        Ok(record) if !record.topics.is_empty() => {
            let recent: Vec<&str> = record
                .topics
                .iter()
                .rev()
                .take(5)
                .map(String::as_str)
                .collect();
            println!("\nRecent topics: {}", recent.join(", "));
        }
        _ => println!("\nNo topics discussed yet."),
    }
}
