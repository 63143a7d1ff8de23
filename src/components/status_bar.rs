use std::time::Duration;

use dioxus::prelude::*;

use crate::constants::*;
use crate::core::repository::format_time;
use crate::state::WatchSession;

/// A transient user-facing status line.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Show a status message and clear it after `STATUS_MESSAGE_MS`, unless a
/// newer message replaced it meanwhile.
pub fn show_status(
    mut status: Signal<Option<StatusMessage>>,
    mut generation: Signal<u64>,
    text: impl Into<String>,
    is_error: bool,
) {
    let my_generation = generation.peek().wrapping_add(1);
    generation.set(my_generation);
    status.set(Some(StatusMessage {
        text: text.into(),
        is_error,
    }));
    spawn(async move {
        tokio::time::sleep(Duration::from_millis(STATUS_MESSAGE_MS)).await;
        if *generation.peek() == my_generation {
            status.set(None);
        }
    });
}

#[component]
pub fn StatusBar(
    status: Signal<Option<StatusMessage>>,
    session: Signal<WatchSession>,
    playhead: Signal<f64>,
) -> Element {
    let message = status();
    let message_color = match &message {
        Some(message) if message.is_error => ACCENT_ERROR,
        Some(_) => ACCENT_OK,
        None => TEXT_DIM,
    };
    let message_text = message
        .map(|message| message.text)
        .unwrap_or_else(|| "Ready".to_string());
    let video_label = session
        .read()
        .video_id
        .clone()
        .unwrap_or_else(|| "no video".to_string());

    rsx! {
        div {
            style: "
                display: flex; align-items: center; justify-content: space-between;
                height: 22px; padding: 0 14px;
                background-color: {BG_SURFACE}; border-top: 1px solid {BORDER_DEFAULT};
                font-size: 11px; color: {TEXT_DIM};
            ",
            span { style: "color: {message_color};", "{message_text}" }
            div {
                style: "display: flex; gap: 16px; font-family: 'SF Mono', Consolas, monospace;",
                span { "{video_label}" }
                span { {format_time(playhead())} }
            }
        }
    }
}
