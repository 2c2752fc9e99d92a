//! Interactive Q&A session over stdin/stdout.

use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::Result;
use crate::files::{FileUpload, format_size};
use crate::pages::QaPage;
use crate::pages::qa::SUGGESTED_QUESTIONS;
use crate::qa::TurnSource;

const HELP: &str = "\
Commands:
  /upload <path>...   upload files for use as context
  /files              list uploaded files
  /select <id>        answer from an uploaded file
  /unselect           answer from the context text instead
  /context <text>     set the context text
  /delete <id>        delete an uploaded file
  /history            show the conversation, newest first
  /clear              clear the conversation
  /suggest [n]        list suggested questions, or ask number n
  /quit               leave
Anything else is asked as a question.";

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Upload(Vec<PathBuf>),
    Files,
    Select(String),
    Unselect,
    Context(String),
    Delete(String),
    History,
    Clear,
    Suggest(Option<usize>),
    Help,
    Quit,
    Ask(String),
    Empty,
}

impl ChatCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        if !trimmed.starts_with('/') {
            return Self::Ask(trimmed.to_string());
        }

        let (command, rest) = trimmed
            .split_once(char::is_whitespace)
            .map(|(c, r)| (c, r.trim()))
            .unwrap_or((trimmed, ""));

        match (command.to_lowercase().as_str(), rest) {
            ("/files", _) => Self::Files,
            ("/unselect", _) => Self::Unselect,
            ("/history", _) => Self::History,
            ("/clear", _) => Self::Clear,
            ("/help" | "/?", _) => Self::Help,
            ("/quit" | "/exit", _) => Self::Quit,
            ("/upload", rest) if !rest.is_empty() => {
                Self::Upload(rest.split_whitespace().map(PathBuf::from).collect())
            }
            ("/select", rest) if !rest.is_empty() => Self::Select(rest.to_string()),
            ("/delete", rest) if !rest.is_empty() => Self::Delete(rest.to_string()),
            ("/context", rest) => Self::Context(rest.to_string()),
            ("/suggest", "") => Self::Suggest(None),
            ("/suggest", rest) => match rest.parse::<usize>() {
                Ok(n) if n >= 1 => Self::Suggest(Some(n - 1)),
                _ => Self::Help,
            },
            _ => Self::Help,
        }
    }
}

/// Run the session until EOF or `/quit`.
pub async fn run_chat(page: &mut QaPage) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprintln!("{HELP}\n");
    eprint!("> ");

    while let Some(line) = lines.next_line().await? {
        match ChatCommand::parse(&line) {
            ChatCommand::Quit => break,
            ChatCommand::Empty => {}
            ChatCommand::Help => eprintln!("{HELP}"),
            ChatCommand::Ask(question) => {
                page.question = question;
                ask(page).await;
            }
            ChatCommand::Suggest(None) => {
                for (i, q) in SUGGESTED_QUESTIONS.iter().enumerate() {
                    println!("  {}. {q}", i + 1);
                }
            }
            ChatCommand::Suggest(Some(index)) => {
                if page.use_suggestion(index).is_some() {
                    ask(page).await;
                } else {
                    eprintln!("No suggestion #{}", index + 1);
                }
            }
            ChatCommand::Upload(paths) => {
                let mut uploads = Vec::with_capacity(paths.len());
                for path in &paths {
                    match FileUpload::from_path(path).await {
                        Ok(upload) => uploads.push(upload),
                        Err(e) => eprintln!("❌ {}: {e}", path.display()),
                    }
                }
                page.upload_files(&uploads).await;
            }
            ChatCommand::Files => print_files(page),
            ChatCommand::Select(id) => match page.select_file(&id) {
                Ok(()) => eprintln!("📄 File selected - ready for Q&A"),
                Err(e) => eprintln!("❌ {e}"),
            },
            ChatCommand::Unselect => {
                page.clear_file_selection();
                eprintln!("Using context text");
            }
            ChatCommand::Context(text) => {
                page.context_text = text;
                eprintln!("{} characters of context", page.context_text.chars().count());
            }
            ChatCommand::Delete(id) => {
                // Failures are already reported through the notifier.
                if page.delete_file(&id).await.is_ok() {
                    print_files(page);
                }
            }
            ChatCommand::History => print_history(page),
            ChatCommand::Clear => page.clear_history(),
        }
        eprint!("> ");
    }
    Ok(())
}

async fn ask(page: &mut QaPage) {
    // Failures are already reported through the notifier.
    if let Ok(turn) = page.ask().await {
        println!("\n{}\n", turn.answer);
    }
}

fn print_files(page: &QaPage) {
    if page.files().is_empty() {
        println!("No files uploaded yet");
        return;
    }
    let selected = page.files().selected_id();
    for file in page.files().iter() {
        let marker = if selected == Some(file.file_id.as_str()) { "*" } else { " " };
        println!(
            "{marker} {}  {}  {} • {}",
            file.file_id,
            file.display_name(),
            format_size(file.file_size),
            file.upload_time()
        );
    }
}

fn print_history(page: &QaPage) {
    if page.history().is_empty() {
        println!("No questions asked yet.");
        return;
    }
    for turn in page.history().iter() {
        let tag = match turn.source {
            TurnSource::File => " 📄 From File",
            TurnSource::Text => "",
        };
        println!("[{}] Q:{tag} {}", turn.timestamp(), turn.question);
        println!("A: {}", turn.answer);
        if !turn.context_used.is_empty() {
            println!("Context used: \"{}\"", turn.context_used);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_questions() {
        assert_eq!(
            ChatCommand::parse("  What grew?  "),
            ChatCommand::Ask("What grew?".into())
        );
        assert_eq!(ChatCommand::parse("   "), ChatCommand::Empty);
    }

    #[test]
    fn commands_with_arguments() {
        assert_eq!(
            ChatCommand::parse("/upload a.pdf  b.txt"),
            ChatCommand::Upload(vec![PathBuf::from("a.pdf"), PathBuf::from("b.txt")])
        );
        assert_eq!(
            ChatCommand::parse("/select file-1"),
            ChatCommand::Select("file-1".into())
        );
        assert_eq!(
            ChatCommand::parse("/context The sky is blue."),
            ChatCommand::Context("The sky is blue.".into())
        );
        assert_eq!(ChatCommand::parse("/suggest 2"), ChatCommand::Suggest(Some(1)));
        assert_eq!(ChatCommand::parse("/SUGGEST"), ChatCommand::Suggest(None));
    }

    #[test]
    fn malformed_commands_show_help() {
        assert_eq!(ChatCommand::parse("/select"), ChatCommand::Help);
        assert_eq!(ChatCommand::parse("/suggest 0"), ChatCommand::Help);
        assert_eq!(ChatCommand::parse("/bogus"), ChatCommand::Help);
        assert_eq!(ChatCommand::parse("/quit"), ChatCommand::Quit);
    }
}
