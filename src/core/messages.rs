//! Surface bus
//!
//! Request/response messaging between the popup surface and the watch
//! surface. The popup never touches the watch page directly: it asks the
//! watch surface what is playing (`GetVideoInfo`) and pokes it to re-render
//! after a write (`RefreshNotes`). Requests carry a oneshot reply channel;
//! an unreachable watch surface shows up as an error string the popup can
//! display.

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

/// What the watch surface knows about the playing video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub video_id: String,
    pub current_time: f64,
    pub video_title: String,
}

/// A request from another surface to the watch surface.
#[derive(Debug)]
pub enum SurfaceRequest {
    /// Reply with the current video, or an error message when none plays
    GetVideoInfo {
        reply: oneshot::Sender<Result<VideoInfo, String>>,
    },
    /// Re-read the store and re-render the panel; reply acknowledges
    RefreshNotes { reply: oneshot::Sender<()> },
}

/// Cloneable sending half of the surface bus.
#[derive(Clone)]
pub struct SurfaceBus {
    tx: mpsc::UnboundedSender<SurfaceRequest>,
}

impl PartialEq for SurfaceBus {
    fn eq(&self, other: &Self) -> bool {
        self.tx.same_channel(&other.tx)
    }
}

impl SurfaceBus {
    /// Create the bus and the receiving end the watch surface drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SurfaceRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Ask the watch surface for the current video.
    pub async fn get_video_info(&self) -> Result<VideoInfo, String> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(SurfaceRequest::GetVideoInfo { reply })
            .map_err(|_| "notes overlay is not reachable".to_string())?;
        response
            .await
            .map_err(|_| "notes overlay did not respond".to_string())?
    }

    /// Notify the watch surface that the store changed underneath it.
    /// Returns whether the surface acknowledged.
    pub async fn refresh_notes(&self) -> bool {
        let (reply, response) = oneshot::channel();
        if self
            .tx
            .send(SurfaceRequest::RefreshNotes { reply })
            .is_err()
        {
            return false;
        }
        response.await.is_ok()
    }
}
