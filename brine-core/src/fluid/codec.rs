//! Conversion between fluid levels and the eight visible fill states.
//!
//! State 1 is a full cell and state 8 a thin film; state 0 means no fluid.

/// Number of visible fill steps.
pub const STATES: i32 = 8;

/// How many eighths of a cell `level` covers, rounding up. Zero for empty cells.
#[must_use]
pub const fn eighths(level: i32, max_fluid: i32) -> i32 {
    if level <= 0 {
        return 0;
    }
    let level = if level > max_fluid { max_fluid } else { level };
    ((level as i64 - 1) * STATES as i64 / max_fluid as i64) as i32 + 1
}

/// The display state written as fluid metadata: `1..=8`, or 0 for `level == 0`.
#[must_use]
pub const fn display_state(level: i32, max_fluid: i32) -> u8 {
    if level <= 0 {
        0
    } else {
        (STATES + 1 - eighths(level, max_fluid)) as u8
    }
}

/// The level a display state stands for. Invalid states read as empty.
#[must_use]
pub const fn level_for_state(state: u8, max_fluid: i32) -> i32 {
    match state {
        1..=8 => (STATES + 1 - state as i32) * (max_fluid >> 3),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: i32 = 2048;

    #[test]
    fn test_known_levels() {
        assert_eq!(display_state(2048, MAX), 1);
        assert_eq!(display_state(1, MAX), 8);
        assert_eq!(display_state(0, MAX), 0);
        assert_eq!(display_state(1024, MAX), 5);
        assert_eq!(display_state(1025, MAX), 4);
    }

    #[test]
    fn test_states_are_monotonic() {
        let mut previous = display_state(1, MAX);
        for level in 2..=MAX {
            let state = display_state(level, MAX);
            assert!(state <= previous, "level {level} went from {previous} to {state}");
            assert!((1..=8).contains(&state));
            previous = state;
        }
    }

    #[test]
    fn test_representative_levels_map_back() {
        for state in 1..=8 {
            assert_eq!(display_state(level_for_state(state, MAX), MAX), state);
        }
        assert_eq!(level_for_state(1, MAX), MAX);
        assert_eq!(level_for_state(0, MAX), 0);
        assert_eq!(level_for_state(9, MAX), 0);
    }
}
