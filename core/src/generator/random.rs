use super::*;
use ndarray::Array2;

/// Seeded generator placing mines by rejection sampling: draw a uniform
/// position, keep it if the cell is still free, repeat until the requested
/// count is reached. The resulting layout is uniform over all mine sets of
/// that size.
///
/// Placement happens before the first reveal and no position is held back
/// as a safe starting cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomLayoutGenerator {
    seed: u64,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, mode: GameMode) -> Result<MineLayout> {
        use rand::prelude::*;

        mode.validate()?;

        let mut mine_mask: Array2<bool> =
            Array2::default((mode.rows as usize, mode.cols as usize));
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut placed: CellCount = 0;

        // termination is only probabilistic, so cap the draws
        let draw_budget = (mode.total_cells() as u32) * 32;
        let mut draws = 0u32;

        while placed < mode.mines && draws < draw_budget {
            let row = rng.random_range(0..mode.rows) as usize;
            let col = rng.random_range(0..mode.cols) as usize;
            draws += 1;
            if !mine_mask[[row, col]] {
                mine_mask[[row, col]] = true;
                placed += 1;
            }
        }

        if placed < mode.mines {
            log::warn!(
                "mine placement stalled after {} draws, filling remaining {} deterministically",
                draws,
                mode.mines - placed
            );
            for cell in mine_mask.iter_mut() {
                if placed == mode.mines {
                    break;
                }
                if !*cell {
                    *cell = true;
                    placed += 1;
                }
            }
        }

        let layout = MineLayout::from_mine_mask(mine_mask);
        if layout.mine_count() != mode.mines {
            log::warn!(
                "generated layout count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                mode.mines
            );
        }
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_exact_mine_count_for_presets() {
        for mode in [
            GameMode::beginner(),
            GameMode::intermediate(),
            GameMode::expert(),
        ] {
            let layout = RandomLayoutGenerator::new(7).generate(mode).unwrap();
            assert_eq!(layout.mine_count(), mode.mines);
            assert_eq!(layout.size(), (mode.rows, mode.cols));
        }
    }

    #[test]
    fn adjacency_counts_match_a_brute_force_recount() {
        let mode = GameMode::intermediate();
        let layout = RandomLayoutGenerator::new(42).generate(mode).unwrap();

        for row in 0..mode.rows {
            for col in 0..mode.cols {
                let pos = (row, col);
                let expected = layout
                    .iter_neighbors(pos)
                    .filter(|&neighbor| layout.is_mine(neighbor))
                    .count() as u8;
                assert_eq!(layout.adjacent_count(pos), expected, "at {:?}", pos);
            }
        }
    }

    #[test]
    fn equal_seeds_give_equal_layouts() {
        let mode = GameMode::expert();
        let first = RandomLayoutGenerator::new(99).generate(mode).unwrap();
        let second = RandomLayoutGenerator::new(99).generate(mode).unwrap();
        let other = RandomLayoutGenerator::new(100).generate(mode).unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn near_full_board_still_places_every_mine() {
        let mode = GameMode::new(3, 3, 8);
        let layout = RandomLayoutGenerator::new(1).generate(mode).unwrap();
        assert_eq!(layout.mine_count(), 8);
        assert_eq!(layout.safe_cell_count(), 1);
    }

    #[test]
    fn degenerate_modes_are_rejected_at_generation() {
        for mode in [GameMode::new(3, 3, 9), GameMode::new(0, 3, 1)] {
            assert_eq!(
                RandomLayoutGenerator::new(0).generate(mode),
                Err(GameError::InvalidConfiguration)
            );
        }
    }
}
