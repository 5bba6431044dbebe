//! Assertions on the internal invariants of the engine, grouped by how expensive they are.
//!
//! An assertion of a level runs only when [`CBS_ASSERT_LEVEL_DEFINITION`] is at least that level.
//! Release builds check [`CBS_ASSERT_SIMPLE`] assertions, which take constant time. Tests and the
//! `debug-checks` feature also run the [`CBS_ASSERT_MODERATE`] and [`CBS_ASSERT_ADVANCED`] ones,
//! the latter of which may scan whole per-node tables.

/// Constant-time checks, e.g. that a node is not assigned twice.
pub const CBS_ASSERT_SIMPLE: u8 = 1;
/// Checks linear in the size of a single clause or queue window.
pub const CBS_ASSERT_MODERATE: u8 = 2;
/// Checks linear in the size of the graph.
pub const CBS_ASSERT_ADVANCED: u8 = 3;

#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const CBS_ASSERT_LEVEL_DEFINITION: u8 = CBS_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const CBS_ASSERT_LEVEL_DEFINITION: u8 = CBS_ASSERT_ADVANCED;

#[macro_export]
#[doc(hidden)]
macro_rules! cbs_assert_at_level {
    ($level:ident, $assertion:ident, $($arg:tt)*) => {
        if $crate::asserts::CBS_ASSERT_LEVEL_DEFINITION >= $crate::asserts::$level {
            $assertion!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! cbs_assert_simple {
    ($($arg:tt)*) => {
        $crate::cbs_assert_at_level!(CBS_ASSERT_SIMPLE, assert, $($arg)*)
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! cbs_assert_eq_simple {
    ($($arg:tt)*) => {
        $crate::cbs_assert_at_level!(CBS_ASSERT_SIMPLE, assert_eq, $($arg)*)
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! cbs_assert_moderate {
    ($($arg:tt)*) => {
        $crate::cbs_assert_at_level!(CBS_ASSERT_MODERATE, assert, $($arg)*)
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! cbs_assert_advanced {
    ($($arg:tt)*) => {
        $crate::cbs_assert_at_level!(CBS_ASSERT_ADVANCED, assert, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn tests_run_every_level() {
        assert_eq!(
            super::CBS_ASSERT_LEVEL_DEFINITION,
            super::CBS_ASSERT_ADVANCED
        );
    }

    #[test]
    #[should_panic(expected = "advanced")]
    fn active_assertions_panic() {
        cbs_assert_advanced!(1 + 1 == 3, "advanced");
    }
}
