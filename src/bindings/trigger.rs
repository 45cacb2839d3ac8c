/// Rising-edge detector over a sampled button level.
///
/// Seeded with the level seen at binding time, so a button that is already
/// held only fires after it is released and pressed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeTrigger {
    pressed_last: bool,
}

impl EdgeTrigger {
    pub fn new(initial: bool) -> Self {
        EdgeTrigger { pressed_last: initial }
    }

    /// Feeds the current level; true only on a released-to-pressed transition
    pub fn update(&mut self, pressed: bool) -> bool {
        let rising = pressed && !self.pressed_last;
        self.pressed_last = pressed;
        rising
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_press() {
        let mut trigger = EdgeTrigger::new(false);
        let samples = [false, true, true, true, false, true, false, false];
        let fired: Vec<bool> = samples.iter().map(|&level| trigger.update(level)).collect();
        assert_eq!(fired, vec![false, true, false, false, false, true, false, false]);
    }

    #[test]
    fn held_since_binding_waits_for_release() {
        let mut trigger = EdgeTrigger::new(true);
        assert!(!trigger.update(true));
        assert!(!trigger.update(true));
        assert!(!trigger.update(false));
        assert!(trigger.update(true));
    }
}
