use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use ragdesk_cli::commands::{handle_command, CommandResult};
use ragdesk_cli::oneshot::ask_once;
use ragdesk_cli::render::{self, describe_ignore, RenderOptions};
use ragdesk_core::constants::locale::SUGGESTED_QUESTIONS;
use ragdesk_core::{
    ApiStatus, ConversationController, IgnoreReason, SendOutcome, SessionId, Settings,
};

/// A finished request, reported back to the input loop.
struct Completion {
    target: SessionId,
    outcome: SendOutcome,
}

/// Ask one question in a fresh session, print the answer, exit.
pub async fn run_single_prompt(settings: &Settings, prompt: &str) -> Result<()> {
    let controller = ConversationController::from_settings(settings);
    let answer = ask_once(&controller, prompt)
        .await
        .with_context(|| format!("Asking {} failed", settings.api.base_url))?;
    println!("{answer}");
    Ok(())
}

pub async fn run_repl(settings: Settings) -> Result<()> {
    tracing::info!("Starting session against {}", settings.api.base_url);
    let controller = Arc::new(ConversationController::from_settings(&settings));
    let mut options = RenderOptions::default();
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();

    println!(
        "Ragdesk v{} · {}",
        env!("CARGO_PKG_VERSION"),
        settings.api.base_url
    );
    report_health(controller.check_health().await);
    show_active(&controller, options);
    prompt_marker();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_line(&controller, &line, &mut options, &done_tx).await {
                    break;
                }
                prompt_marker();
            }
            Some(done) = done_rx.recv() => {
                report_completion(&controller, done, options);
                prompt_marker();
            }
        }
    }

    Ok(())
}

/// Returns false when the user asked to quit.
async fn handle_line(
    controller: &Arc<ConversationController>,
    line: &str,
    options: &mut RenderOptions,
    done_tx: &mpsc::UnboundedSender<Completion>,
) -> bool {
    match handle_command(line) {
        CommandResult::Quit => return false,
        CommandResult::Message(text) => println!("{text}"),
        CommandResult::NewSession => {
            controller.create_session();
            show_active(controller, *options);
        }
        CommandResult::ListSessions => {
            let state = controller.snapshot();
            println!(
                "{}",
                render::format_session_list(&state, controller.health_status())
            );
        }
        CommandResult::SwitchSession(index) => match session_at(controller, index) {
            Some(id) => {
                controller.select_session(&id);
                show_active(controller, *options);
            }
            None => println!("No session {}. See /sessions.", index + 1),
        },
        CommandResult::DeleteSession(index) => match session_at(controller, index) {
            Some(id) => {
                let state = controller.delete_session(&id);
                println!(
                    "Deleted. {}",
                    render::format_footer(state.sessions.len(), controller.health_status())
                );
                show_active(controller, *options);
            }
            None => println!("No session {}. See /sessions.", index + 1),
        },
        CommandResult::Clear => {
            let id = controller.active_session_id();
            controller.clear_history(&id);
            println!("Conversation cleared.");
        }
        CommandResult::CheckHealth => {
            println!("Checking service...");
            report_health(controller.check_health().await);
        }
        CommandResult::AskSuggested(index) => match SUGGESTED_QUESTIONS.get(index) {
            Some(question) => {
                println!("You: {question}");
                submit(controller, question, done_tx);
            }
            None => println!("No suggested question {}.", index + 1),
        },
        CommandResult::ToggleReasoning => {
            options.show_reasoning = !options.show_reasoning;
            println!("Reasoning trace {}.", on_off(options.show_reasoning));
        }
        CommandResult::ToggleInsights => {
            options.show_insights = !options.show_insights;
            println!("Retrieval details {}.", on_off(options.show_insights));
        }
        CommandResult::NotACommand => submit(controller, line, done_tx),
    }
    true
}

/// Hand the question to a background task so the prompt stays usable.
fn submit(
    controller: &Arc<ConversationController>,
    text: &str,
    done_tx: &mpsc::UnboundedSender<Completion>,
) {
    if text.trim().is_empty() {
        return;
    }
    let status = controller.health_status();
    if !status.can_send() {
        println!("Service is {status}. Use /health to check again.");
        return;
    }
    if controller.is_sending() {
        println!("{}", describe_ignore(IgnoreReason::Busy));
        return;
    }

    let target = controller.active_session_id();
    let controller = Arc::clone(controller);
    let done_tx = done_tx.clone();
    let question = text.to_string();
    tokio::spawn(async move {
        let outcome = controller.send_message(&question, &target).await;
        let _ = done_tx.send(Completion { target, outcome });
    });
    println!("Thinking...");
}

fn report_completion(controller: &ConversationController, done: Completion, options: RenderOptions) {
    if let SendOutcome::Ignored(reason) = done.outcome {
        println!("{}", describe_ignore(reason));
        return;
    }

    let state = controller.snapshot();
    let Some(session) = state.session(&done.target) else {
        println!("The conversation this answer belonged to was deleted.");
        return;
    };
    if session.id != state.active_session_id {
        println!("New answer in \"{}\" (see /sessions).", session.title);
        return;
    }
    if let Some(message) = session.last_message() {
        println!("{}", render::format_message(message, options));
    }
}

fn show_active(controller: &ConversationController, options: RenderOptions) {
    let state = controller.snapshot();
    let session = state.active_session();
    println!("── {} ──", session.title);
    if session.is_empty() {
        println!("{}", render::format_suggestions());
    } else {
        println!("{}", render::format_transcript(session, options));
    }
    println!("{}", render::disclaimer());
}

fn report_health(status: ApiStatus) {
    match status {
        ApiStatus::Ready => println!("Service ready."),
        ApiStatus::Initializing => {
            println!("Service is still initializing. Use /health to check again.")
        }
        ApiStatus::Error => println!("Cannot reach the service. Use /health to retry."),
        ApiStatus::Checking => println!("Checking service..."),
    }
}

fn session_at(controller: &ConversationController, index: usize) -> Option<SessionId> {
    controller
        .snapshot()
        .sessions
        .get(index)
        .map(|s| s.id.clone())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

fn prompt_marker() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
