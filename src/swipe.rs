/// Minimum travel, in pixels, for a drag to count as a swipe.
pub const SWIPE_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// Tap, short drag, or a page request with nowhere to go.
    Ignored,
    PageTo(usize),
    DetailView,
}

/// Interprets a released drag against the image list of the displayed card.
pub fn interpret(dx: f64, dy: f64, image_index: usize, image_count: usize) -> SwipeOutcome {
    let abs_x = dx.abs();
    let abs_y = dy.abs();

    if abs_x > SWIPE_THRESHOLD {
        if dx > 0.0 {
            if image_index > 0 {
                return SwipeOutcome::PageTo(image_index - 1);
            }
        } else if image_index + 1 < image_count {
            return SwipeOutcome::PageTo(image_index + 1);
        }
        return SwipeOutcome::Ignored;
    }

    if abs_y > SWIPE_THRESHOLD && abs_y > abs_x && dy < 0.0 {
        return SwipeOutcome::DetailView;
    }

    SwipeOutcome::Ignored
}
