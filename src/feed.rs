//! Detector delivery: the latest set of hands, last-delivered-wins.
//!
//! The landmark detector runs on its own schedule and hands results to
//! whatever implements `HandObserver`.  Nothing is queued; a slow detector
//! simply leaves the previous result in place until it is replaced.

use tracing::{debug, info};

use crate::hand::HandObservation;

/// Receiver of detector results.
pub trait HandObserver {
    /// Replace the current frame's hands with `hands`.
    fn on_hands(&mut self, hands: Vec<HandObservation>);
}

/// Holds the most recently delivered hand set.
#[derive(Debug, Clone)]
pub struct HandFeed {
    latest: Vec<HandObservation>,
    running: bool,
    /// Total deliveries accepted since creation.
    deliveries: u64,
}

impl Default for HandFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl HandFeed {
    pub fn new() -> Self {
        Self {
            latest: Vec::new(),
            running: true,
            deliveries: 0,
        }
    }

    /// Hands from the last accepted delivery.
    pub fn hands(&self) -> &[HandObservation] {
        &self.latest
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn deliveries(&self) -> u64 {
        self.deliveries
    }

    /// Stop accepting deliveries.  The last hand set is kept as-is.
    pub fn stop(&mut self) {
        if self.running {
            info!("Hand feed stopped after {} deliveries", self.deliveries);
        }
        self.running = false;
    }

    /// Resume accepting deliveries.
    pub fn start(&mut self) {
        if !self.running {
            info!("Hand feed started");
        }
        self.running = true;
    }
}

impl HandObserver for HandFeed {
    fn on_hands(&mut self, hands: Vec<HandObservation>) {
        if !self.running {
            debug!("Hand feed: dropped delivery of {} hands while stopped", hands.len());
            return;
        }
        self.latest = hands;
        self.deliveries += 1;
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::hand::{test_hand, Handedness};

    fn one_hand(x: f32) -> Vec<HandObservation> {
        vec![test_hand(Point::new(x, 0.0), Point::new(x, 0.0), 0.9, Handedness::Left)]
    }

    #[test]
    fn test_new_feed_is_empty_and_running() {
        let feed = HandFeed::new();
        assert!(feed.hands().is_empty());
        assert!(feed.is_running());
        assert_eq!(feed.deliveries(), 0);
    }

    #[test]
    fn test_last_delivery_wins() {
        let mut feed = HandFeed::new();
        feed.on_hands(one_hand(1.0));
        feed.on_hands(one_hand(2.0));
        assert_eq!(feed.hands().len(), 1);
        assert_eq!(feed.hands()[0].keypoints[4].x, 2.0);
        assert_eq!(feed.deliveries(), 2);
    }

    #[test]
    fn test_empty_delivery_replaces() {
        let mut feed = HandFeed::new();
        feed.on_hands(one_hand(1.0));
        feed.on_hands(Vec::new());
        assert!(feed.hands().is_empty());
    }

    #[test]
    fn test_stopped_feed_freezes() {
        let mut feed = HandFeed::new();
        feed.on_hands(one_hand(1.0));
        feed.stop();
        feed.on_hands(one_hand(5.0));
        assert!(!feed.is_running());
        assert_eq!(feed.hands()[0].keypoints[4].x, 1.0);
        assert_eq!(feed.deliveries(), 1);

        feed.start();
        feed.on_hands(one_hand(5.0));
        assert_eq!(feed.hands()[0].keypoints[4].x, 5.0);
    }
}
