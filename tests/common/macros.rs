/// Asserts that an organism stands in the given cell.
#[macro_export]
macro_rules! assert_at {
    ($world:expr, $id:expr, $at:expr) => {
        assert!(
            ecoscript_core::space::Space::cell(&$world, $at)
                .expect("coordinate out of bounds")
                .contains($id),
            "Organism {} is not at {}",
            $id,
            $at
        );
    };
}

/// Asserts that an organism is dead and no longer on the grid.
#[macro_export]
macro_rules! assert_gone {
    ($world:expr, $id:expr) => {
        assert!(
            !$world.organism($id).expect("organism not found").alive(),
            "Organism {} should be dead",
            $id
        );
        assert_eq!(
            $world.position_of($id),
            None,
            "Organism {} is still on the grid",
            $id
        );
    };
}

/// Asserts that the number of organisms on the grid matches the expected value.
#[macro_export]
macro_rules! assert_population {
    ($world:expr, $count:expr) => {
        assert_eq!($world.population(), $count, "Population count mismatch");
    };
}
