//! Application entry point — Storyloom writing desk.
//!
//! A line-oriented shell for working on one chapter, wiring every subsystem
//! together the way the full application does:
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Build the persistence client and the best-effort AI gateway.
//! 4. Open the chapter (fetch its content; start empty when the service is
//!    unreachable).
//! 5. Spawn the editor coordinator and a save-outcome printer.
//! 6. Read stdin until `:quit` / EOF.
//!
//! Plain lines are appended to the draft (the edit path).  Commands:
//!
//! | Command              | Effect                                   |
//! |----------------------|------------------------------------------|
//! | `:save`              | Manual save ("Save Now")                 |
//! | `:autosave on\|off`  | Toggle the debounced auto-save           |
//! | `:interval <secs>`   | Change the auto-save quiet period        |
//! | `:suggest`           | AI writing suggestions for the draft     |
//! | `:reply <prompt>`    | Ask the narrator character, spoken aloud |
//! | `:history`           | List this chapter's saved versions       |
//! | `:status`            | Show phase, dirty flag and word count    |
//! | `:quit`              | Exit                                     |

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use storyloom::{
    ai::{ApiGateway, BestEffortAi, CharacterPersona, StoryAi, StoryContext},
    config::AppConfig,
    editor::{
        new_shared_state, word_count, EditorCommand, EditorCoordinator, EditorEvent,
        SharedEditorState,
    },
    speech::{MutedSynthesizer, Synthesizer},
    store::{HttpVersionStore, VersionStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = AppConfig::load()?;
    if AppConfig::is_first_run() {
        config.save()?;
        log::info!("wrote default settings");
    }

    let chapter_id = std::env::args().nth(1).unwrap_or_else(|| "draft".into());

    let store: Arc<dyn VersionStore> = Arc::new(HttpVersionStore::from_config(&config.store));
    let ai: Arc<dyn StoryAi> = Arc::new(BestEffortAi::new(ApiGateway::from_config(&config.ai)));
    let narrator_voice: Arc<dyn Synthesizer> = Arc::new(MutedSynthesizer);

    // ── Open the chapter ─────────────────────────────────────────────────
    let (initial_content, title) = match store.fetch_chapter(&chapter_id).await {
        Ok(chapter) => (chapter.content, chapter.title),
        Err(e) => {
            log::warn!("could not fetch chapter {chapter_id}: {e}; starting empty");
            (String::new(), "Untitled".to_string())
        }
    };

    println!("── {title} ──");
    println!("({} words; :save, :suggest, :status, :quit …)", word_count(&initial_content));

    // ── Editing session ──────────────────────────────────────────────────
    let state = new_shared_state(initial_content, &config.editor);
    let (command_tx, command_rx) = mpsc::channel(16);
    let (event_tx, mut event_rx) = mpsc::channel(16);

    let coordinator = EditorCoordinator::new(
        chapter_id.clone(),
        Arc::clone(&store),
        Arc::clone(&state),
        event_tx,
    );
    tokio::spawn(coordinator.run(command_rx));

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                EditorEvent::Saved { record } => {
                    println!(
                        "[saved version {} ({}, {} words)]",
                        record.id, record.tag, record.word_count
                    );
                }
                EditorEvent::SaveFailed { message, .. } => {
                    println!("[save failed: {message}; use :save to retry]");
                }
            }
        }
    });

    // ── Line loop ────────────────────────────────────────────────────────
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();

        if let Some(command) = trimmed.strip_prefix(':') {
            let (verb, rest) = command.split_once(' ').unwrap_or((command, ""));
            match verb {
                "quit" => break,
                "save" => command_tx.send(EditorCommand::ManualSave).await?,
                "autosave" => {
                    let enabled = rest.trim() == "on";
                    command_tx
                        .send(EditorCommand::SetAutoSaveEnabled(enabled))
                        .await?;
                }
                "interval" => match rest.trim().parse::<u64>() {
                    Ok(secs) => {
                        command_tx
                            .send(EditorCommand::SetAutoSaveInterval(
                                std::time::Duration::from_secs(secs),
                            ))
                            .await?;
                    }
                    Err(_) => println!("usage: :interval <seconds>"),
                },
                "suggest" => suggest(&ai, &state).await,
                "reply" => {
                    reply(&ai, &narrator_voice, &title, rest).await;
                }
                "history" => history(&store, &chapter_id).await,
                "status" => status(&state),
                _ => println!("unknown command :{verb}"),
            }
            continue;
        }

        if trimmed.is_empty() {
            continue;
        }

        // Append the line to the draft and run it through the edit path.
        let content = {
            let st = state.lock().unwrap();
            if st.current_content.is_empty() {
                format!("<p>{trimmed}</p>")
            } else {
                format!("{}<p>{trimmed}</p>", st.current_content)
            }
        };
        command_tx.send(EditorCommand::Edit { content }).await?;
    }

    println!("bye");
    Ok(())
}

/// Ask the gateway for suggestions on the current draft.
async fn suggest(ai: &Arc<dyn StoryAi>, state: &SharedEditorState) {
    let context = {
        let st = state.lock().unwrap();
        let prose = storyloom::editor::strip_markup(&st.current_content);
        let prose = prose.trim();
        if prose.is_empty() {
            println!("nothing drafted yet");
            return;
        }
        let mut context = StoryContext::from_synopsis(prose.chars().take(240).collect::<String>());
        if let Some(last) = prose.lines().last() {
            context.recent_passages.push(last.to_string());
        }
        context
    };

    // Best-effort: an empty set means the backend was unreachable.
    let set = ai.suggestions(&context).await.unwrap_or_default();
    if set.is_empty() {
        println!("no suggestions right now, try again shortly");
        return;
    }
    for idea in &set.plot_suggestions {
        println!("plot      - {idea}");
    }
    for idea in &set.character_interactions {
        println!("character - {idea}");
    }
    for idea in &set.style_suggestions {
        println!("style     - {idea}");
    }
}

/// Ask the narrator character for a reply and voice it.
async fn reply(ai: &Arc<dyn StoryAi>, voice: &Arc<dyn Synthesizer>, title: &str, prompt: &str) {
    if prompt.trim().is_empty() {
        println!("usage: :reply <prompt>");
        return;
    }

    let narrator = CharacterPersona {
        name: format!("The narrator of \"{title}\""),
        description: "the omniscient narrator of this story".into(),
        traits: vec!["wry".into(), "observant".into()],
    };

    match ai.character_reply(&narrator, prompt).await {
        Ok(line) => {
            voice.speak(&line);
            println!("{line}");
        }
        Err(e) => println!("no reply: {e}"),
    }
}

/// Print this chapter's version history, newest first.
async fn history(store: &Arc<dyn VersionStore>, chapter_id: &str) {
    match store.list_versions(chapter_id).await {
        Ok(versions) if versions.is_empty() => println!("no versions yet"),
        Ok(versions) => {
            for v in versions {
                println!(
                    "{}  {:<11}  {:>6} words  {}",
                    v.created_at.format("%Y-%m-%d %H:%M:%S"),
                    v.tag.as_str(),
                    v.word_count,
                    v.id
                );
            }
        }
        Err(e) => println!("could not load history: {e}"),
    }
}

/// Print the session's save status.
fn status(state: &SharedEditorState) {
    let st = state.lock().unwrap();
    println!(
        "{} | dirty: {} | {} words | auto-save: {} every {:?}",
        st.phase.label(),
        st.dirty,
        word_count(&st.current_content),
        if st.autosave_enabled { "on" } else { "off" },
        st.autosave_interval,
    );
    if let Some(message) = &st.error_message {
        println!("last error: {message}");
    }
}
