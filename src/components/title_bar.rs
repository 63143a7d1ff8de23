use dioxus::prelude::*;

use crate::constants::*;

/// Window chrome: navigation controls, a video id / URL box, and the
/// view/quick-add buttons.
#[component]
pub fn TitleBar(
    library_active: bool,
    can_back: bool,
    can_forward: bool,
    on_back: EventHandler<MouseEvent>,
    on_forward: EventHandler<MouseEvent>,
    on_navigate: EventHandler<String>,
    on_toggle_library: EventHandler<MouseEvent>,
    on_quick_add: EventHandler<MouseEvent>,
) -> Element {
    let mut address = use_signal(String::new);

    let mut submit = move || {
        let raw = address().trim().to_string();
        if raw.is_empty() {
            return;
        }
        // Accept either a full watch URL or a bare video id
        let url = if raw.contains('?') || raw.contains('/') {
            raw
        } else {
            format!("/watch?v={}", urlencoding::encode(&raw))
        };
        address.set(String::new());
        on_navigate.call(url);
    };

    let nav_button_style = |enabled: bool| {
        format!(
            "background: transparent; border: none; font-size: 13px; padding: 4px 8px;
             border-radius: 4px; color: {}; cursor: {};",
            if enabled { TEXT_PRIMARY } else { TEXT_DIM },
            if enabled { "pointer" } else { "default" },
        )
    };
    let library_bg = if library_active { BG_HOVER } else { "transparent" };

    rsx! {
        div {
            style: "
                display: flex; align-items: center; gap: 12px;
                height: 40px; padding: 0 16px;
                background-color: {BG_SURFACE}; border-bottom: 1px solid {BORDER_DEFAULT};
                user-select: none;
            ",
            span {
                style: "font-size: 13px; font-weight: 600; color: {TEXT_SECONDARY};",
                "WatchNotes"
            }
            div {
                style: "display: flex; align-items: center; gap: 2px;",
                button {
                    style: nav_button_style(can_back),
                    disabled: !can_back,
                    aria_label: "Back",
                    onclick: move |event| on_back.call(event),
                    "\u{2190}"
                }
                button {
                    style: nav_button_style(can_forward),
                    disabled: !can_forward,
                    aria_label: "Forward",
                    onclick: move |event| on_forward.call(event),
                    "\u{2192}"
                }
            }
            input {
                r#type: "text",
                placeholder: "Video id or /watch?v=...",
                style: "
                    flex: 1; max-width: 420px; padding: 5px 10px; font-size: 12px;
                    background-color: {BG_ELEVATED}; color: {TEXT_PRIMARY};
                    border: 1px solid {BORDER_DEFAULT}; border-radius: 4px; outline: none;
                ",
                value: "{address}",
                oninput: move |event| address.set(event.value()),
                onkeydown: move |event| {
                    if event.key() == Key::Enter {
                        submit();
                    }
                },
            }
            div { style: "flex: 1;" }
            button {
                style: "
                    background: transparent; border: none; color: {TEXT_PRIMARY};
                    font-size: 12px; cursor: pointer; padding: 4px 8px; border-radius: 4px;
                ",
                onclick: move |event| on_quick_add.call(event),
                "Quick Add"
            }
            button {
                style: "
                    background-color: {library_bg}; border: none; color: {TEXT_PRIMARY};
                    font-size: 12px; cursor: pointer; padding: 4px 8px; border-radius: 4px;
                ",
                onclick: move |event| on_toggle_library.call(event),
                "Library"
            }
        }
    }
}
