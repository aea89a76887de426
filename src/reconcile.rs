//! Per-event effects on the session context.
//!
//! Every function here runs to completion under the context lock and never
//! fails: malformed input falls back to defaults instead of aborting the
//! handler.

use crate::events::{
    BackendEvent, ChatHistoryLoadedPayload, ContextBuiltPayload, ErrorPayload,
    MessageReceivedPayload, MessageSentPayload, ToolExecutedPayload,
};
use crate::models::{Message, Role};
use crate::session::SessionContext;
use crate::timestamp;

pub fn apply_event(ctx: &mut SessionContext, event: &BackendEvent) {
    match event {
        BackendEvent::CharacterLoaded(payload) => {
            tracing::info!(session = %payload.uuid, "character loaded");
            if ctx.active_session_id().is_some() && !ctx.state.is_active(&payload.uuid) {
                // Loading another character is a switch; nothing carries over
                ctx.transcript.clear();
                ctx.context_cache = None;
            }
            ctx.state.mark_loaded(&payload.uuid);
        }
        BackendEvent::ChatHistoryLoaded(payload) => apply_history_loaded(ctx, payload),
        BackendEvent::MessageSent(payload) => apply_message_sent(ctx, payload),
        BackendEvent::MessageReceived(payload) => apply_message_received(ctx, payload),
        BackendEvent::ContextBuilt(payload) => apply_context_built(ctx, payload),
        BackendEvent::CharacterUpdated(payload) => {
            tracing::info!(
                session = %payload.uuid,
                fields = payload.details.len(),
                "character updated"
            );
        }
        BackendEvent::ToolExecuted(payload) => log_tool_executed(payload),
        BackendEvent::SessionUnloaded(payload) => {
            if ctx.state.is_active(&payload.uuid) {
                tracing::info!(session = %payload.uuid, "session unloaded");
                ctx.reset();
            } else {
                tracing::debug!(
                    session = %payload.uuid,
                    active = ?ctx.active_session_id(),
                    "ignoring unload for inactive session"
                );
            }
        }
        BackendEvent::Error(payload) => apply_error(ctx, payload),
        BackendEvent::TokenStats(payload) => {
            tracing::debug!(total = payload.token_usage.total_tokens, "token stats");
            ctx.state.update_token_usage(payload.token_usage);
        }
        BackendEvent::Progress(payload) => {
            tracing::debug!(fields = ?payload.fields, "progress");
        }
    }
}

/// Messages for a session other than the active one are dropped. With no
/// active session every message is accepted.
fn accepts_session(ctx: &SessionContext, uuid: &str) -> bool {
    match ctx.active_session_id() {
        Some(active) if active != uuid => {
            tracing::warn!(session = uuid, active, "dropping message for inactive session");
            false
        }
        _ => true,
    }
}

fn append(ctx: &mut SessionContext, uuid: &str, message: Message) {
    let record = message.to_record();
    ctx.transcript.append(message);
    ctx.chat_store.add_message(uuid, record);
}

fn apply_history_loaded(ctx: &mut SessionContext, payload: &ChatHistoryLoadedPayload) {
    let uuid = payload.uuid.as_str();
    if !ctx.state.is_active(uuid) {
        ctx.state.begin_loading(uuid);
        ctx.context_cache = None;
    }

    let messages: Vec<Message> = payload
        .chat_history
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let stamp = record
                .timestamp
                .and_then(timestamp::from_raw)
                .map(|ts| timestamp::id_stamp(&ts))
                .unwrap_or(index as i64);
            Message::from_record(format!("{}_{}", stamp, uuid), record)
        })
        .collect();

    ctx.transcript.replace(messages);
    ctx.chat_store.set_history(uuid, payload.chat_history.clone());
    ctx.chat_store.set_active_character(uuid);

    tracing::info!(
        session = uuid,
        count = ctx.transcript.len(),
        "chat history loaded"
    );
}

fn apply_message_sent(ctx: &mut SessionContext, payload: &MessageSentPayload) {
    if !accepts_session(ctx, &payload.uuid) {
        return;
    }
    if payload.message.role != Role::User {
        tracing::debug!(
            session = %payload.uuid,
            role = %payload.message.role,
            "ignoring message-sent for non-user role"
        );
        return;
    }

    // The UI may already have appended this message optimistically
    if ctx.transcript.contains_user_content(&payload.message.content) {
        tracing::debug!(session = %payload.uuid, "message-sent echo already present");
        return;
    }

    let ts = timestamp::normalize(payload.message.timestamp);
    let message = Message::new(
        format!("{}_sent_{}", timestamp::id_stamp(&ts), payload.uuid),
        Role::User,
        payload.message.content.clone(),
        ts,
    );
    append(ctx, &payload.uuid, message);
}

fn apply_message_received(ctx: &mut SessionContext, payload: &MessageReceivedPayload) {
    if !accepts_session(ctx, &payload.uuid) {
        return;
    }
    let uuid = payload.uuid.as_str();

    if !payload.intermediate_messages.is_empty() {
        tracing::debug!(
            session = uuid,
            count = payload.intermediate_messages.len(),
            "appending intermediate tool-call messages"
        );
    }

    for (index, record) in payload.intermediate_messages.iter().enumerate() {
        let mut message = Message::from_record(String::new(), record);
        message.id = format!(
            "{}_intermediate_{}_{}",
            timestamp::id_stamp(&message.timestamp),
            index,
            uuid
        );
        append(ctx, uuid, message);
    }

    let reply = &payload.message;
    let ts = timestamp::normalize(reply.timestamp);
    let mut message = Message::new(
        format!("{}_received_{}", timestamp::id_stamp(&ts), uuid),
        Role::Assistant,
        reply.content.clone(),
        ts,
    );
    message.tool_calls = reply.tool_calls.clone();
    message.tool_call_id = reply.tool_call_id.clone();
    message.name = reply.name.clone();
    append(ctx, uuid, message);
}

fn apply_context_built(ctx: &mut SessionContext, payload: &ContextBuiltPayload) {
    if ctx.active_session_id().is_some() && !ctx.state.is_active(&payload.uuid) {
        tracing::debug!(session = %payload.uuid, "ignoring context for inactive session");
        return;
    }
    ctx.context_cache = Some(payload.context_result.clone());
}

fn log_tool_executed(payload: &ToolExecutedPayload) {
    if payload.success {
        tracing::info!(
            tool = %payload.tool_name,
            elapsed_ms = payload.execution_time_ms,
            "tool executed"
        );
    } else {
        tracing::warn!(
            tool = %payload.tool_name,
            elapsed_ms = payload.execution_time_ms,
            error = payload.error.as_deref().unwrap_or("unknown error"),
            "tool failed"
        );
    }
}

fn apply_error(ctx: &mut SessionContext, payload: &ErrorPayload) {
    tracing::warn!(
        code = %payload.error_code,
        message = %payload.error_message,
        "backend error"
    );

    let uuid = payload.uuid.as_deref().unwrap_or("unknown");
    let ts = timestamp::normalize(payload.timestamp);
    let message = Message::new(
        format!("error_{}_{}", timestamp::id_stamp(&ts), uuid),
        Role::Assistant,
        format!(
            "⚠️ System error [{}]: {}",
            payload.error_code, payload.error_message
        ),
        ts,
    );
    match payload.uuid.as_deref() {
        Some(session) => append(ctx, session, message),
        None => {
            ctx.transcript.append(message);
        }
    }
}
