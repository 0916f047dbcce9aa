//! Step cursor transitions as pure functions of (index, event).

/// A navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    Advance,
    Retreat,
}

/// Where the cursor goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    /// Move to this index.
    Step(usize),
    /// No-op (retreat at index 0).
    Stay,
    /// Advance past the last step: run the completion sequence.
    Complete,
}

/// Next cursor position for `event` at `current`, with `last` the final index.
pub fn next_position(current: usize, last: usize, event: NavEvent) -> NavTarget {
    match event {
        NavEvent::Advance if current < last => NavTarget::Step(current + 1),
        NavEvent::Advance => NavTarget::Complete,
        NavEvent::Retreat if current > 0 => NavTarget::Step(current - 1),
        NavEvent::Retreat => NavTarget::Stay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_walks_to_completion() {
        let last = 8;
        let mut current = 0;
        while let NavTarget::Step(next) = next_position(current, last, NavEvent::Advance) {
            assert_eq!(next, current + 1);
            current = next;
        }
        assert_eq!(current, last);
        assert_eq!(next_position(last, last, NavEvent::Advance), NavTarget::Complete);
    }

    #[test]
    fn retreat_stops_at_first_step() {
        assert_eq!(next_position(3, 8, NavEvent::Retreat), NavTarget::Step(2));
        assert_eq!(next_position(0, 8, NavEvent::Retreat), NavTarget::Stay);
    }

    #[test]
    fn single_step_catalog_completes_immediately() {
        assert_eq!(next_position(0, 0, NavEvent::Advance), NavTarget::Complete);
        assert_eq!(next_position(0, 0, NavEvent::Retreat), NavTarget::Stay);
    }
}
