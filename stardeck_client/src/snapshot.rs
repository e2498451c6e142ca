//! Outbound snapshot policy.
//!
//! The frame loop produces one candidate snapshot per rendered frame. The
//! policy forwards one only when it differs from the last snapshot sent or
//! when the heartbeat interval has elapsed. Terminal snapshots do not pass
//! through here; the scene sends those unconditionally.

use stardeck_shared::proto::PlayerSnapshot;

#[derive(Debug)]
pub struct SnapshotPolicy {
    heartbeat: u32,
    frames_since_emit: u32,
    last: Option<PlayerSnapshot>,
}

impl SnapshotPolicy {
    pub fn new(heartbeat: u32) -> Self {
        Self {
            heartbeat: heartbeat.max(1),
            frames_since_emit: 0,
            last: None,
        }
    }

    /// Returns the snapshot if it should be emitted this frame.
    pub fn offer(&mut self, snap: PlayerSnapshot) -> Option<PlayerSnapshot> {
        self.frames_since_emit += 1;
        let changed = self.last.as_ref() != Some(&snap);
        if changed || self.frames_since_emit >= self.heartbeat {
            self.frames_since_emit = 0;
            self.last = Some(snap.clone());
            Some(snap)
        } else {
            None
        }
    }
}
