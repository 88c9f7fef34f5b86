use std::collections::BTreeSet;

use lanescroll::NodeId;

/// The nodes due in one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameTick {
    pub now_ms: u64,
    /// Time since the previous frame; `None` for the first frame after an idle period.
    pub elapsed_ms: Option<u64>,
    pub nodes: Vec<NodeId>,
}

/// The "register for next frame" side of a frame loop.
///
/// Nodes ask for a frame while they move; the adapter starts each frame with
/// [`Self::begin_frame`], which hands out the requests and clears them. A node that wants
/// to keep moving must ask again.
#[derive(Clone, Debug, Default)]
pub struct FrameScheduler {
    requested: BTreeSet<NodeId>,
    last_frame_ms: Option<u64>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when `id` was not already waiting.
    pub fn request_frame(&mut self, id: NodeId) -> bool {
        self.requested.insert(id)
    }

    /// Returns `true` when a request was withdrawn.
    pub fn cancel_frame(&mut self, id: NodeId) -> bool {
        let removed = self.requested.remove(&id);
        if removed && self.requested.is_empty() {
            self.last_frame_ms = None;
        }
        removed
    }

    pub fn is_requested(&self, id: NodeId) -> bool {
        self.requested.contains(&id)
    }

    pub fn has_pending(&self) -> bool {
        !self.requested.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.requested.iter().copied()
    }

    /// Takes the requested nodes for the frame at `now_ms`.
    pub fn begin_frame(&mut self, now_ms: u64) -> FrameTick {
        let nodes: Vec<NodeId> = std::mem::take(&mut self.requested).into_iter().collect();
        let elapsed_ms = self.last_frame_ms.map(|last| now_ms.saturating_sub(last));
        self.last_frame_ms = if nodes.is_empty() { None } else { Some(now_ms) };
        atrace!(now_ms, ?elapsed_ms, nodes = nodes.len(), "begin_frame");
        FrameTick {
            now_ms,
            elapsed_ms,
            nodes,
        }
    }
}
