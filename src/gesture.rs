//! Pointer tracking for the swipe card.

const ROTATION_PER_PX: f64 = 0.05;
const FADE_DISTANCE: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Dominant-axis classification of a drag offset.
    pub fn classify(dx: f64, dy: f64) -> Self {
        if dx.abs() > dy.abs() {
            if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub start: Point,
    pub dx: f64,
    pub dy: f64,
    pub direction: Option<Direction>,
}

impl DragSession {
    fn begin(start: Point) -> Self {
        Self {
            start,
            dx: 0.0,
            dy: 0.0,
            direction: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    session: Option<DragSession>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn press(&mut self, at: Point) {
        self.session = Some(DragSession::begin(at));
    }

    /// Updates the offset of an active drag. Inert until `press`.
    pub fn move_to(&mut self, at: Point) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.dx = at.x - session.start.x;
        session.dy = at.y - session.start.y;
        session.direction = Some(Direction::classify(session.dx, session.dy));
    }

    pub fn release(&mut self) -> Option<DragSession> {
        self.session.take()
    }

    pub fn cancel(&mut self) {
        self.session = None;
    }

    pub fn pose(&self) -> CardPose {
        match &self.session {
            Some(session) => CardPose::for_offset(session.dx, session.dy),
            None => CardPose::resting(),
        }
    }
}

/// Visual transform of the card while it follows the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPose {
    pub translate_x: f64,
    pub translate_y: f64,
    pub rotation_deg: f64,
    pub opacity: f64,
}

impl CardPose {
    pub fn resting() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            rotation_deg: 0.0,
            opacity: 1.0,
        }
    }

    pub fn for_offset(dx: f64, dy: f64) -> Self {
        Self {
            translate_x: dx,
            translate_y: dy,
            rotation_deg: dx * ROTATION_PER_PX,
            opacity: (1.0 - dx.abs() / FADE_DISTANCE).clamp(0.0, 1.0),
        }
    }

    pub fn is_resting(&self) -> bool {
        *self == Self::resting()
    }

    pub fn to_style(&self, dragging: bool) -> String {
        format!(
            "transform: translateX({:.1}px) rotate({:.2}deg) translateY({:.1}px); opacity: {:.3}; transition: {};",
            self.translate_x,
            self.rotation_deg,
            self.translate_y,
            self.opacity,
            if dragging {
                "transform 0s"
            } else {
                "transform 0.25s ease, opacity 0.25s ease"
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_before_press_is_ignored() {
        let mut tracker = GestureTracker::new();
        tracker.move_to(Point::new(40.0, 10.0));
        assert!(!tracker.is_active());
        assert!(tracker.release().is_none());
    }

    #[test]
    fn offset_is_relative_to_anchor() {
        let mut tracker = GestureTracker::new();
        tracker.press(Point::new(100.0, 200.0));
        tracker.move_to(Point::new(60.0, 215.0));
        let session = tracker.release().unwrap();
        assert_eq!(session.dx, -40.0);
        assert_eq!(session.dy, 15.0);
        assert_eq!(session.direction, Some(Direction::Left));
        assert!(!tracker.is_active());
    }

    #[test]
    fn direction_follows_dominant_axis() {
        assert_eq!(Direction::classify(30.0, 5.0), Direction::Right);
        assert_eq!(Direction::classify(-30.0, 5.0), Direction::Left);
        assert_eq!(Direction::classify(5.0, 30.0), Direction::Down);
        assert_eq!(Direction::classify(5.0, -30.0), Direction::Up);
        // ties go to the vertical axis
        assert_eq!(Direction::classify(10.0, -10.0), Direction::Up);
    }

    #[test]
    fn cancel_drops_session() {
        let mut tracker = GestureTracker::new();
        tracker.press(Point::new(0.0, 0.0));
        tracker.move_to(Point::new(150.0, 0.0));
        tracker.cancel();
        assert!(tracker.release().is_none());
        assert!(tracker.pose().is_resting());
    }

    #[test]
    fn pose_fades_with_horizontal_distance() {
        let pose = CardPose::for_offset(250.0, -20.0);
        assert_eq!(pose.translate_x, 250.0);
        assert_eq!(pose.translate_y, -20.0);
        assert!((pose.rotation_deg - 12.5).abs() < 1e-9);
        assert!((pose.opacity - 0.5).abs() < 1e-9);

        let far = CardPose::for_offset(-900.0, 0.0);
        assert_eq!(far.opacity, 0.0);
    }
}
