//! Swipe/tap classification for a single list item.
//!
//! A gesture is a start coordinate followed by an end coordinate. It is a swipe when the
//! horizontal displacement exceeds [`SWIPE_MIN_DX`] while the vertical displacement stays below
//! [`SWIPE_MAX_DY`]. Anything else is a tap, which the detector reports but never acts on.

use derive_more::Constructor;

/// Minimum absolute horizontal displacement (px) for a swipe.
pub const SWIPE_MIN_DX: f64 = 50.0;

/// Maximum absolute vertical displacement (px) for a swipe.
pub const SWIPE_MAX_DY: f64 = 50.0;

/// Pointer position in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Constructor)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Swipe,
    Tap,
}

impl Gesture {
    pub fn classify(start: Point, end: Point) -> Self {
        let dx = end.x - start.x;
        let dy = end.y - start.y;

        if dx.abs() > SWIPE_MIN_DX && dy.abs() < SWIPE_MAX_DY {
            Gesture::Swipe
        } else {
            Gesture::Tap
        }
    }
}

/// Transient state between gesture start and gesture end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    pub start: Point,
}

/// Per-item gesture tracker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureDetector {
    session: Option<GestureSession>,
}

impl GestureDetector {
    pub fn start(&mut self, at: Point) {
        self.session = Some(GestureSession { start: at });
    }

    /// Finish the gesture in progress. Returns `None` if no gesture was in progress.
    /// The session is always cleared.
    pub fn end(&mut self, at: Point) -> Option<Gesture> {
        self.session
            .take()
            .map(|session| Gesture::classify(session.start, at))
    }

    pub fn in_progress(&self) -> bool {
        self.session.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        struct TestCase {
            dx: f64,
            dy: f64,
            expected: Gesture,
        }

        let tests = vec![
            TestCase {
                // TC0: right swipe
                dx: 80.0,
                dy: 5.0,
                expected: Gesture::Swipe,
            },
            TestCase {
                // TC1: left swipe
                dx: -80.0,
                dy: -5.0,
                expected: Gesture::Swipe,
            },
            TestCase {
                // TC2: short horizontal movement is a tap
                dx: 10.0,
                dy: 5.0,
                expected: Gesture::Tap,
            },
            TestCase {
                // TC3: horizontal threshold is exclusive
                dx: 50.0,
                dy: 0.0,
                expected: Gesture::Tap,
            },
            TestCase {
                // TC4: vertical threshold is exclusive
                dx: 80.0,
                dy: 50.0,
                expected: Gesture::Tap,
            },
            TestCase {
                // TC5: diagonal drag is a tap
                dx: 120.0,
                dy: -90.0,
                expected: Gesture::Tap,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let start = Point::new(100.0, 100.0);
            let end = Point::new(100.0 + test.dx, 100.0 + test.dy);
            assert_eq!(Gesture::classify(start, end), test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_end_without_start_is_ignored() {
        let mut detector = GestureDetector::default();
        assert_eq!(detector.end(Point::new(200.0, 0.0)), None);
    }

    #[test]
    fn test_end_always_clears_session() {
        let mut detector = GestureDetector::default();

        detector.start(Point::new(0.0, 0.0));
        assert!(detector.in_progress());
        assert_eq!(detector.end(Point::new(10.0, 5.0)), Some(Gesture::Tap));
        assert!(!detector.in_progress());

        detector.start(Point::new(0.0, 0.0));
        assert_eq!(detector.end(Point::new(80.0, 5.0)), Some(Gesture::Swipe));
        assert_eq!(detector.end(Point::new(80.0, 5.0)), None);
    }
}
