use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Purely random placement: samples uniform indices and rejects the ones that already hold a
/// mine. First-click safety is handled later by the engine, not here.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator<R> {
    rng: R,
}

impl<R: Rng> RandomMinefieldGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomMinefieldGenerator<SmallRng> {
    /// Reproducible layouts for a given seed.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> MinefieldGenerator for RandomMinefieldGenerator<R> {
    fn generate(mut self, config: GameConfig) -> Result<MineLayout> {
        config.validate()?;

        let total_cells = CellIndex::from(config.total_cells());
        let mut layout = MineLayout::empty(config.width, config.height);
        let mut rejected = 0usize;
        while layout.mine_count() < config.mines {
            let index = self.rng.random_range(0..total_cells);
            if !layout.place_mine(index) {
                rejected += 1;
            }
        }

        log::debug!(
            "Generated {}x{} minefield with {} mines, {} samples rejected",
            config.width,
            config.height,
            config.mines,
            rejected
        );
        Ok(layout)
    }
}
