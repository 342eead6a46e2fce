//! Slideshow
//!
//! Image cycling for a product card. While the card is hovered or focused the
//! index advances every interval and wraps around; when hover ends it snaps back
//! to the first image. Picking an image directly stops the automatic cycle.

use jiff::{SignedDuration, Timestamp};
use smallvec::SmallVec;

/// Default time each image is shown while cycling.
pub const DEFAULT_INTERVAL: SignedDuration = SignedDuration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Idle,
    Cycling { next_at: Timestamp },
    Manual,
}

/// Cyclic index over a card's images.
#[derive(Debug, Clone)]
pub struct Slideshow {
    images: SmallVec<[String; 4]>,
    index: usize,
    interval: SignedDuration,
    mode: Mode,
}

impl Slideshow {
    /// Create an idle slideshow showing the first image.
    pub fn new(images: impl IntoIterator<Item = String>, interval: SignedDuration) -> Self {
        Self {
            images: images.into_iter().collect(),
            index: 0,
            interval,
            mode: Mode::Idle,
        }
    }

    /// Hover or focus started: begin cycling, first advance one interval from `now`.
    ///
    /// Has no effect when already cycling, or when there is nothing to cycle through.
    pub fn start(&mut self, now: Timestamp) {
        if matches!(self.mode, Mode::Cycling { .. }) || !self.can_cycle() {
            return;
        }

        self.mode = Mode::Cycling {
            next_at: now.checked_add(self.interval).unwrap_or(Timestamp::MAX),
        };
    }

    /// Advance by every whole interval elapsed up to `now`.
    ///
    /// Returns whether the shown image changed.
    pub fn tick(&mut self, now: Timestamp) -> bool {
        let Mode::Cycling { next_at } = self.mode else {
            return false;
        };

        if now < next_at {
            return false;
        }

        let interval_ms = self.interval.as_millis();
        let len = i128::try_from(self.images.len()).unwrap_or(i128::MAX);
        let steps = 1 + now.duration_since(next_at).as_millis() / interval_ms;

        let previous = self.index;
        let index = i128::try_from(self.index).unwrap_or(0);

        self.index = usize::try_from((index + steps) % len).unwrap_or(0);

        let advance = i64::try_from(steps * interval_ms).unwrap_or(i64::MAX);

        self.mode = Mode::Cycling {
            next_at: next_at
                .checked_add(SignedDuration::from_millis(advance))
                .unwrap_or(Timestamp::MAX),
        };

        self.index != previous
    }

    /// Hover or focus ended: stop cycling and return to the first image.
    pub fn stop(&mut self) {
        self.mode = Mode::Idle;
        self.index = 0;
    }

    /// Show image `index` and cancel automatic cycling until the next [`Slideshow::start`].
    ///
    /// Out-of-range indices are ignored and return `false`.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.images.len() {
            return false;
        }

        self.index = index;
        self.mode = Mode::Manual;

        true
    }

    /// Index of the shown image.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// URI of the shown image.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.images.get(self.index).map(String::as_str)
    }

    /// Whether the slideshow is advancing automatically.
    #[must_use]
    pub fn is_cycling(&self) -> bool {
        matches!(self.mode, Mode::Cycling { .. })
    }

    /// Number of images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Check if there are no images.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    fn can_cycle(&self) -> bool {
        self.images.len() > 1 && self.interval.as_millis() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: i64) -> Timestamp {
        Timestamp::from_millisecond(ms).unwrap_or(Timestamp::UNIX_EPOCH)
    }

    fn slideshow(n: usize) -> Slideshow {
        Slideshow::new(
            (0..n).map(|i| format!("/img/{i}.jpg")),
            SignedDuration::from_millis(1000),
        )
    }

    #[test]
    fn advances_once_per_interval_while_cycling() {
        let mut show = slideshow(3);

        show.start(at(0));

        assert!(!show.tick(at(999)));
        assert!(show.tick(at(1_000)));
        assert_eq!(show.index(), 1);
        assert!(show.tick(at(2_000)));
        assert_eq!(show.current(), Some("/img/2.jpg"));
    }

    #[test]
    fn wraps_around_to_first_image() {
        let mut show = slideshow(3);

        show.start(at(0));
        show.tick(at(3_000));

        assert_eq!(show.index(), 0);
    }

    #[test]
    fn late_tick_catches_up_on_missed_intervals() {
        let mut show = slideshow(4);

        show.start(at(0));

        assert!(show.tick(at(2_500)));
        assert_eq!(show.index(), 2);
        assert!(!show.tick(at(2_900)));
        assert!(show.tick(at(3_000)));
        assert_eq!(show.index(), 3);
    }

    #[test]
    fn stop_resets_to_first_image() {
        let mut show = slideshow(3);

        show.start(at(0));
        show.tick(at(1_000));
        show.stop();

        assert_eq!(show.index(), 0);
        assert!(!show.is_cycling());
        assert!(!show.tick(at(5_000)));
    }

    #[test]
    fn go_to_cancels_cycling() {
        let mut show = slideshow(3);

        show.start(at(0));

        assert!(show.go_to(2));
        assert!(!show.is_cycling());
        assert!(!show.tick(at(10_000)));
        assert_eq!(show.index(), 2);
    }

    #[test]
    fn go_to_out_of_range_is_ignored() {
        let mut show = slideshow(2);

        assert!(!show.go_to(2));
        assert_eq!(show.index(), 0);
    }

    #[test]
    fn start_after_manual_navigation_resumes_cycling() {
        let mut show = slideshow(3);

        show.go_to(1);
        show.start(at(0));
        show.tick(at(1_000));

        assert_eq!(show.index(), 2);
    }

    #[test]
    fn single_image_never_cycles() {
        let mut show = slideshow(1);

        show.start(at(0));

        assert!(!show.is_cycling());
        assert!(!show.tick(at(5_000)));
        assert_eq!(show.current(), Some("/img/0.jpg"));
    }

    #[test]
    fn empty_slideshow_has_no_current_image() {
        let show = slideshow(0);

        assert!(show.is_empty());
        assert_eq!(show.current(), None);
    }
}
