//! Interactive chat with the Ye persona.
//!
//! # Usage
//!
//! ```bash
//! # Credential from the environment
//! YECHAT_API_KEY=sk-... yechat
//!
//! # Open the first chat with a message, as the landing page would
//! yechat --message "Tell me about your art"
//!
//! # Talk to a compatible provider elsewhere, without colors
//! yechat --api-url http://localhost:8080/v1 --no-color
//! ```
//!
//! # Commands
//!
//! - `/new [message]` - Start a new chat, optionally opening with a message
//! - `/history` - Show the current chat again
//! - `/help` - Show available commands
//! - `/quit` - Exit the application
//!
//! Set `RUST_LOG=yechat=debug` to see request and session diagnostics on stderr.

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use yechat::CompletionClient;
use yechat::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, Handoff, PlainTextRenderer, Renderer,
    help_text, parse_command,
};

const GREETING: &str = "Welcome to YeezyGPT, how can I help you?";

/// Tracks how much of the transcript has reached the terminal.
struct Transcript {
    session: ChatSession<CompletionClient>,
    shown: usize,
}

impl Transcript {
    fn open(client: &CompletionClient, handoff: Handoff) -> Self {
        Self {
            session: ChatSession::with_handoff(client.clone(), handoff),
            shown: 0,
        }
    }

    fn show_new(&mut self, renderer: &mut dyn Renderer) {
        let messages = self.session.messages();
        renderer.render_transcript(messages.get(self.shown..).unwrap_or_default());
        self.shown = messages.len();
    }

    fn show_all(&mut self, renderer: &mut dyn Renderer) {
        let messages = self.session.messages();
        renderer.render_transcript(&messages);
        self.shown = messages.len();
    }

    async fn send_seed(&mut self, renderer: &mut dyn Renderer) {
        if self.session.has_pending_seed() {
            renderer.print_pending();
        }
        match self.session.process_seed().await {
            Ok(_) => self.show_new(renderer),
            Err(err) => renderer.print_error(&err.to_string()),
        }
    }

    async fn send(&mut self, text: &str, renderer: &mut dyn Renderer) {
        renderer.print_pending();
        match self.session.submit(text).await {
            Ok(()) => self.show_new(renderer),
            Err(err) => renderer.print_error(&err.to_string()),
        }
    }
}

/// Main entry point for the yechat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let (args, _) = ChatArgs::from_command_line_relaxed("yechat [OPTIONS]");
    let config = ChatConfig::from_env(args)?;
    log::debug!("starting with {config:?}");

    let client = config.client()?;
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut rl = DefaultEditor::new()?;

    println!("{GREETING}");
    println!("Type /help for commands, /quit to exit\n");

    let mut transcript = Transcript::open(&client, config.handoff());
    transcript.send_seed(&mut renderer).await;

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::New(message) => {
                            let handoff = Handoff::from(message);
                            if let Some(query) = handoff.to_query() {
                                renderer.print_info(&format!("Link to this opener: ?{query}"));
                            }
                            transcript = Transcript::open(&client, handoff);
                            renderer.print_info(&format!("\n{GREETING}"));
                            transcript.send_seed(&mut renderer).await;
                        }
                        ChatCommand::History => {
                            if transcript.session.is_empty() {
                                renderer.print_info("No messages yet.");
                            } else {
                                transcript.show_all(&mut renderer);
                            }
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                transcript.send(line, &mut renderer).await;
            }
            Err(ReadlineError::Interrupted) => {
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}
