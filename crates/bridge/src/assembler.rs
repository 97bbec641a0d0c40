//! Outbound message assembly.

use carebridge_core::message::Message;

/// The system instruction followed by the history, unchanged and in order.
pub fn assemble_chat(instruction: &str, history: Vec<Message>) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(Message::system(instruction));
    messages.extend(history);
    messages
}

/// Render a history as one `Label: content` line per message.
///
/// User messages are labelled `User`, assistant messages `AI`.
pub fn render_transcript(history: &[Message]) -> String {
    history
        .iter()
        .map(|m| format!("{}: {}", m.role.transcript_label(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A single user message carrying the summary instruction and the transcript.
pub fn assemble_summary(instruction: &str, history: &[Message]) -> Vec<Message> {
    let transcript = render_transcript(history);
    vec![Message::user(format!("{instruction}\n\n{transcript}"))]
}
