//! Shared UI constants: colors, timings, the watch-page template, and the
//! page scripts evaluated inside the webview.

pub const BG_DEEPEST: &str = "#09090b";
pub const BG_BASE: &str = "#0a0a0b";
pub const BG_ELEVATED: &str = "#141414";
pub const BG_SURFACE: &str = "#1a1a1a";
pub const BG_HOVER: &str = "#262626";

pub const BORDER_SUBTLE: &str = "#1f1f1f";
pub const BORDER_DEFAULT: &str = "#27272a";
pub const BORDER_STRONG: &str = "#3f3f46";

pub const TEXT_PRIMARY: &str = "#fafafa";
pub const TEXT_SECONDARY: &str = "#a1a1aa";
pub const TEXT_MUTED: &str = "#71717a";
pub const TEXT_DIM: &str = "#52525b";

pub const ACCENT_NOTE: &str = "#f97316";
pub const ACCENT_OK: &str = "#22c55e";
pub const ACCENT_ERROR: &str = "#ef4444";

/// Fixed id of the panel host element; re-renders are idempotent against it
pub const PANEL_HOST_ID: &str = "watchnotes-panel-host";

/// Initial render retry budget while the player is still mounting
pub const RENDER_MAX_ATTEMPTS: u32 = 10;
pub const RENDER_RETRY_DELAY_MS: u64 = 500;

/// Fallback poll for navigation the other signal sources missed
pub const NAVIGATION_POLL_INTERVAL_MS: u64 = 2000;

/// How long transient status messages stay visible
pub const STATUS_MESSAGE_MS: u64 = 3000;

/// The watch page markup. This is host-site content the injector treats as
/// opaque: it is swappable per site skin, and nothing outside the template
/// may rely on its structure. `{{SRC}}` and `{{TITLE}}` are substituted
/// (pre-escaped) before rendering.
pub const WATCH_PAGE_TEMPLATE: &str = r#"
<div id="content">
  <div id="columns">
    <div id="primary">
      <div id="primary-inner">
        <svg class="page-decor" width="0" height="0" aria-hidden="true">
          <defs>
            <linearGradient id="player-glow"><stop offset="0%" stop-color="#f97316"/></linearGradient>
          </defs>
        </svg>
        <div id="player">
          <video id="movie-player" controls preload="metadata" src="{{SRC}}"
                 style="width: 100%; max-height: 480px; background: #000; border-radius: 8px;"></video>
        </div>
        <watch-metadata id="watch-metadata">
          <h1 style="font-size: 18px; margin: 12px 0 4px 0; color: #fafafa;">{{TITLE}}</h1>
          <div id="description" style="font-size: 12px; color: #71717a;">
            Local media &middot; annotate with timestamped notes
          </div>
        </watch-metadata>
      </div>
    </div>
    <div id="secondary">
      <div id="related"></div>
    </div>
  </div>
</div>
"#;

/// Reports bulk DOM mutations, coalesced so a render burst produces one
/// signal instead of hundreds.
pub const MUTATION_WATCH_SCRIPT: &str = r#"
let pending = false;
const observer = new MutationObserver(() => {
    if (pending) {
        return;
    }
    pending = true;
    setTimeout(() => {
        pending = false;
        dioxus.send({ mutated: true });
    }, 250);
});
observer.observe(document, { subtree: true, childList: true });
await new Promise(() => {});
"#;

/// Serves snapshot harvests and panel mount commands.
///
/// Harvest walks the document in document order and reports a flat element
/// skeleton, skipping the panel host's own subtree so the panel never
/// anchors against itself. Mount re-locates the resolved target by its
/// child-index path, verifies the tag still matches, and moves the host
/// element there.
pub const INJECTOR_SCRIPT: &str = r#"
function harvest(skipId) {
    const nodes = [];
    const walk = (el, parent) => {
        if (skipId && el.id === skipId) {
            return;
        }
        const index = nodes.length;
        nodes.push({ tag: el.tagName.toLowerCase(), id: el.id || null, parent: parent });
        for (let child = el.firstElementChild; child; child = child.nextElementSibling) {
            walk(child, index);
        }
    };
    walk(document.documentElement, null);
    return nodes;
}

function resolvePath(path) {
    let el = document.documentElement;
    for (const index of path) {
        el = el.children[index];
        if (!el) {
            return null;
        }
    }
    return el;
}

while (true) {
    const msg = await dioxus.recv();
    if (msg.kind === "harvest") {
        dioxus.send({ kind: "snapshot", nodes: harvest(msg.host_id) });
    } else if (msg.kind === "park") {
        const host = document.getElementById(msg.host_id);
        const slot = document.getElementById("watchnotes-parking");
        if (host && slot && host.parentElement !== slot) {
            slot.appendChild(host);
        }
        dioxus.send({ kind: "parked" });
    } else if (msg.kind === "mount") {
        const host = document.getElementById(msg.host_id);
        if (!host) {
            dioxus.send({ kind: "mounted", ok: false });
            continue;
        }
        let ok = false;
        if (msg.placement === "append") {
            document.body.appendChild(host);
            ok = true;
        } else {
            const target = resolvePath(msg.path);
            if (target && target.tagName.toLowerCase() === msg.tag) {
                target.insertAdjacentElement(
                    msg.placement === "before" ? "beforebegin" : "afterend",
                    host
                );
                ok = true;
            }
        }
        dioxus.send({ kind: "mounted", ok: ok });
    }
}
"#;

/// Bridges the page's media element: streams the play-head position out and
/// applies seek commands in, pulsing the panel for visual feedback.
pub const PLAYER_BRIDGE_SCRIPT: &str = r#"
const hostId = "watchnotes-panel-host";

setInterval(() => {
    const video = document.querySelector("video");
    if (video) {
        dioxus.send({ time: video.currentTime || 0 });
    }
}, 500);

while (true) {
    const msg = await dioxus.recv();
    if (msg.kind !== "seek") {
        continue;
    }
    const video = document.querySelector("video");
    if (!video) {
        continue;
    }
    video.currentTime = msg.time;
    const host = document.getElementById(hostId);
    if (host) {
        host.classList.add("wn-jumping");
        setTimeout(() => host.classList.remove("wn-jumping"), 500);
    }
}
"#;

/// Global stylesheet: only what inline styles cannot express.
pub const GLOBAL_CSS: &str = r#"
@keyframes wn-pulse {
    0% { box-shadow: 0 0 0 0 rgba(249, 115, 22, 0.55); }
    100% { box-shadow: 0 0 0 12px rgba(249, 115, 22, 0); }
}
.wn-jumping {
    animation: wn-pulse 0.5s ease-out;
}
textarea::placeholder, input::placeholder {
    color: #52525b;
}
"#;
