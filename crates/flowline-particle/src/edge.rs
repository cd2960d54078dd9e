use flowline_core::Canvas;
use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// What a particle does after leaving the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Keep going; the particle may come back on its own.
    None,
    /// Teleport to the opposite edge and start a new stroke.
    Wrap,
    /// Start a new life.
    #[default]
    Kill,
    /// Teleport to the opposite edge and keep drawing the same stroke.
    WrapContinue,
    /// Reverse the whole velocity vector.
    Bounce,
}

/// Result of applying an [`EdgePolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    /// Nothing changed.
    Unchanged,
    /// The position moved to the opposite edge.
    Wrapped {
        /// True if the open stroke must end.
        break_stroke: bool,
    },
    /// The particle must reset.
    Kill,
    /// The velocity was inverted.
    Bounced,
}

impl EdgePolicy {
    /// Every policy.
    pub const ALL: [EdgePolicy; 5] = [
        EdgePolicy::None,
        EdgePolicy::Wrap,
        EdgePolicy::Kill,
        EdgePolicy::WrapContinue,
        EdgePolicy::Bounce,
    ];

    /// Picks a policy, drawing again once if the first pick is
    /// [`EdgePolicy::WrapContinue`] so it comes up less often.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let pick = Self::ALL[rng.random_range(0..Self::ALL.len())];
        if pick == EdgePolicy::WrapContinue {
            return Self::ALL[rng.random_range(0..Self::ALL.len())];
        }
        pick
    }

    /// Applies the policy to a particle that left `canvas`.
    ///
    /// Wrapping only touches the axis that is out of bounds.
    pub fn apply(self, canvas: Canvas, position: &mut Vec2, velocity: &mut Vec2) -> EdgeOutcome {
        match self {
            EdgePolicy::None => EdgeOutcome::Unchanged,
            EdgePolicy::Wrap | EdgePolicy::WrapContinue => {
                *position = wrap(*position, canvas);
                EdgeOutcome::Wrapped {
                    break_stroke: self == EdgePolicy::Wrap,
                }
            }
            EdgePolicy::Kill => EdgeOutcome::Kill,
            EdgePolicy::Bounce => {
                *velocity = -*velocity;
                EdgeOutcome::Bounced
            }
        }
    }
}

fn wrap(position: Vec2, canvas: Canvas) -> Vec2 {
    let axis = |v: f32, size: f32| {
        if v < 0.0 || v > size {
            v.rem_euclid(size)
        } else {
            v
        }
    };
    Vec2::new(
        axis(position.x, canvas.width as f32),
        axis(position.y, canvas.height as f32),
    )
}
