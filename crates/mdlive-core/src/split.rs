//! Two-pane split with a draggable divider.
//!
//! [`SplitState`] is an immutable snapshot: `ratio` is the left pane's share of the container in
//! percent and always lies in `[MIN_RATIO, MAX_RATIO]`. Transitions go through
//! [`SplitState::apply`].
//!
//! While dragging, a pointer position whose ratio falls outside the band is ignored rather than
//! clamped, so the divider sticks at the last accepted position until the pointer comes back into
//! range.

pub const MIN_RATIO: f64 = 20.0;
pub const MAX_RATIO: f64 = 80.0;
pub const DEFAULT_RATIO: f64 = 50.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DividerEvent {
    /// Pointer pressed on the divider.
    Press,
    /// Pointer moved to absolute horizontal position `x`.
    Move { x: f64 },
    /// Pointer released, anywhere.
    Release,
}

/// Horizontal extent of the container the divider splits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Container {
    pub left: f64,
    pub width: f64,
}

impl Container {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// The ratio for pointer position `x`, or `None` for a degenerate container.
    pub fn ratio_at(&self, x: f64) -> Option<f64> {
        if !(self.width.is_finite() && self.width > 0.0) || !x.is_finite() {
            return None;
        }
        Some((x - self.left) / self.width * 100.0)
    }
}

pub fn in_band(ratio: f64) -> bool {
    (MIN_RATIO..=MAX_RATIO).contains(&ratio)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitState {
    ratio: f64,
    phase: DragPhase,
}

impl Default for SplitState {
    fn default() -> Self {
        Self::new(DEFAULT_RATIO)
    }
}

impl SplitState {
    /// Initial ratios outside the band are clamped into it; non-finite values fall back to the
    /// default.
    pub fn new(ratio: f64) -> Self {
        let ratio = if ratio.is_finite() {
            ratio.clamp(MIN_RATIO, MAX_RATIO)
        } else {
            DEFAULT_RATIO
        };
        Self {
            ratio,
            phase: DragPhase::Idle,
        }
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    pub fn apply(self, event: DividerEvent, container: Container) -> Self {
        match (self.phase, event) {
            (_, DividerEvent::Press) => Self {
                phase: DragPhase::Dragging,
                ..self
            },
            (_, DividerEvent::Release) => Self {
                phase: DragPhase::Idle,
                ..self
            },
            (DragPhase::Idle, DividerEvent::Move { .. }) => self,
            (DragPhase::Dragging, DividerEvent::Move { x }) => match container.ratio_at(x) {
                Some(ratio) if in_band(ratio) => Self { ratio, ..self },
                _ => self,
            },
        }
    }

    /// Splits `total` columns into `(left, right)` around a `divider` of fixed width.
    pub fn pane_widths(&self, total: u16, divider: u16) -> (u16, u16) {
        let available = total.saturating_sub(divider);
        let left = (available as f64 * self.ratio / 100.0).round() as u16;
        let left = left.min(available);
        (left, available - left)
    }
}
