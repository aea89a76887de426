use colored::*;

use crate::grouping::DisplayGroup;
use crate::models::Role;
use crate::session::SessionState;

const PREVIEW_CHARS: usize = 200;

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let cut: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

/// Plain diagnostic dump of display groups
pub fn display_groups(groups: &[DisplayGroup]) {
    for group in groups {
        match group {
            DisplayGroup::Normal { message } => {
                let label = match message.role {
                    Role::User => "user".green(),
                    Role::Assistant => "assistant".cyan(),
                    Role::System => "system".yellow(),
                    Role::Tool => "tool".magenta(),
                };
                println!(
                    "{} {} {}",
                    message.timestamp.format("%H:%M:%S").to_string().dimmed(),
                    label.bold(),
                    message.content
                );
            }
            DisplayGroup::ToolExecution {
                tool_calls,
                tool_results,
                timestamp,
            } => {
                println!(
                    "{} {}",
                    timestamp.format("%H:%M:%S").to_string().dimmed(),
                    "tools".magenta().bold()
                );
                for call in tool_calls {
                    println!(
                        "  {} {}({})",
                        "call".dimmed(),
                        call.function.name,
                        preview(&call.function.arguments)
                    );
                }
                for result in tool_results {
                    let id = result.tool_call_id.as_deref().unwrap_or("?");
                    println!("  {} [{}] {}", "result".dimmed(), id, preview(&result.content));
                }
            }
        }
    }
}

pub fn display_summary(state: &SessionState, messages: usize, groups: usize) {
    let session = state.session_id.as_deref().unwrap_or("none");
    eprintln!(
        "{}",
        format!(
            "session={} loaded={} messages={} groups={} tokens={}",
            session, state.is_loaded, messages, groups, state.token_usage.total_tokens
        )
        .dimmed()
    );
}
