//! Interactive chat loop.

use crate::render;
use anyhow::Result;
use heartline_core::{CharacterProfile, PairKey};
use heartline_dialogue::ConversationService;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const HELP: &str = "Commands: /status, /unlocks, /history, /help, /quit";

pub async fn run(service: &ConversationService, profile: &CharacterProfile, key: &PairKey) -> Result<()> {
    let mut editor = DefaultEditor::new()?;

    let record = service.status(key).await?;
    println!("{}", render::status(profile, &record));
    println!("{}\n", HELP);

    loop {
        let line = match editor.readline("you> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(input);

        match input {
            "/quit" | "/exit" => break,
            "/help" => println!("{}", HELP),
            "/status" => {
                let record = service.status(key).await?;
                println!("{}", render::status(profile, &record));
            }
            "/unlocks" => {
                let items = service.unlocked_content(key).await?;
                if items.is_empty() {
                    println!("Nothing unlocked yet.");
                }
                for item in &items {
                    println!("{}", render::unlocked_item(item));
                }
            }
            "/history" => {
                let entries = service.history(key, 20).await?;
                println!("{}", render::history(profile, &entries));
            }
            other if other.starts_with('/') => println!("Unknown command. {}", HELP),
            message => match service.take_turn(key, message).await {
                Ok(report) => println!("{}\n", render::turn(profile, &report)),
                Err(e) => {
                    tracing::error!("Turn failed: {:#}", e);
                    println!("[error] {:#}\n", e);
                }
            },
        }
    }

    println!("Goodbye.");
    Ok(())
}
