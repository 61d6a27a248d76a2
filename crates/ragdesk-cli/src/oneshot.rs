use anyhow::{bail, Result};
use ragdesk_core::{ConversationController, SendOutcome};

use crate::render::describe_ignore;

/// Ask one question in a session of its own and return the answer text.
///
/// Creating the session is a no-op when the newest one is still empty, so
/// repeated failed runs do not pile up blank sessions.
pub async fn ask_once(controller: &ConversationController, prompt: &str) -> Result<String> {
    let status = controller.check_health().await;
    if !status.can_send() {
        bail!("Service is not ready ({status})");
    }

    controller.create_session();

    match controller.send_to_active(prompt).await {
        SendOutcome::Answered => {
            let state = controller.snapshot();
            Ok(state
                .active_session()
                .last_message()
                .map(|m| m.display_text().to_string())
                .unwrap_or_default())
        }
        SendOutcome::Failed(text) => bail!(text),
        SendOutcome::Ignored(reason) => bail!(describe_ignore(reason)),
    }
}
