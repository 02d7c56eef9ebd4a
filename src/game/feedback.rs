//! Collision Audio Feedback
//!
//! Debounces obstacle collisions into resume/pause cues for the music
//! track. A collision resumes playback from a cursor; once the feedback
//! window elapses playback pauses and the cursor steps forward, so each
//! bounce plays the next short slice of the song.

use serde::{Serialize, Deserialize};

/// Cue for the audio collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum FeedbackCue {
    /// Start playback at `from` seconds into the track
    Resume { from: f64 },
    /// Pause playback
    Pause,
}

/// Timing constants for the feedback window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackTiming {
    /// How long a slice plays after a collision (seconds)
    pub window: f64,
    /// Cursor advance per slice (seconds)
    pub step: f64,
    /// Cursor resets to zero once it reaches this point (seconds)
    pub wrap_at: f64,
}

impl Default for FeedbackTiming {
    fn default() -> Self {
        Self {
            window: 0.3,
            step: 0.6,
            wrap_at: 30.0,
        }
    }
}

/// Debounce state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionFeedback {
    /// When the current slice started, if one is playing
    pub started_at: Option<f64>,
    /// Playback cursor into the track (seconds)
    pub playback_position: f64,
}

impl CollisionFeedback {
    /// True while a slice is playing.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    /// Feed one frame. Returns the cue to apply, if any.
    ///
    /// Collisions while a slice is already playing are ignored; the slice
    /// is not extended.
    pub fn update(&mut self, now: f64, collided: bool, timing: &FeedbackTiming) -> Option<FeedbackCue> {
        match self.started_at {
            None if collided => {
                self.started_at = Some(now);
                Some(FeedbackCue::Resume { from: self.playback_position })
            }
            Some(started) if now - started >= timing.window => {
                self.started_at = None;
                if self.playback_position >= timing.wrap_at {
                    self.playback_position = 0.0;
                }
                self.playback_position += timing.step;
                Some(FeedbackCue::Pause)
            }
            _ => None,
        }
    }
}
