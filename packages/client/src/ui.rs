//! UI utilities for the client.

use std::io::Write;

use rustyline::{
    Context, Editor, Helper, completion::Completer, error::ReadlineError, highlight::Highlighter,
    hint::Hinter, history::DefaultHistory, validate::Validator,
};
use tokio::sync::mpsc;

use crate::typing::DraftSink;

/// Redisplay the prompt after receiving a message
pub fn redisplay_prompt(user_id: &str) {
    print!("{}> ", user_id);
    std::io::stdout().flush().ok();
}

/// Line-editor helper that reports every edit of the draft, which is how
/// typing indicators see keystrokes.
struct DraftHelper {
    drafts: DraftSink,
}

impl Hinter for DraftHelper {
    type Hint = String;

    fn hint(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        self.drafts.draft_changed(line);
        None
    }
}

impl Completer for DraftHelper {
    type Candidate = String;
}

impl Highlighter for DraftHelper {}

impl Validator for DraftHelper {}

impl Helper for DraftHelper {}

/// Spawn the blocking readline thread.
///
/// Submitted lines arrive on the returned channel, which closes on Ctrl+C or
/// Ctrl+D. The thread lives as long as the process, across reconnects.
pub fn spawn_line_reader(user_id: String, drafts: DraftSink) -> mpsc::UnboundedReceiver<String> {
    let (line_tx, line_rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        let mut rl = match Editor::<DraftHelper, DefaultHistory>::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };
        rl.set_helper(Some(DraftHelper { drafts }));

        let prompt = format!("{}> ", user_id);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if line_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    line_rx
}
