//! Committing extracted tiles into a tile store

use crate::chips::TileStore;

/// How extracted tiles are written to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitMode {
    /// Skip tiles whose data is already in the store; write the rest to
    /// the lowest free slot.
    #[default]
    Unique,
    /// Write every non-empty tile to the slot matching its position in the
    /// source image.
    Positional,
}

impl CommitMode {
    pub fn from_unique(unique: bool) -> Self {
        if unique {
            CommitMode::Unique
        } else {
            CommitMode::Positional
        }
    }
}

impl std::fmt::Display for CommitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitMode::Unique => write!(f, "unique"),
            CommitMode::Positional => write!(f, "non-unique"),
        }
    }
}

/// What happened to one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Written to this slot.
    Written(usize),
    /// Identical data already lives in this slot.
    Duplicate(usize),
    /// Every pixel is the mask index.
    Empty,
    /// The store is full, or the tile's position is past its last slot.
    CapacityReached,
}

impl CommitOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, CommitOutcome::Written(_))
    }
}

/// Per-job write state threaded through every commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobContext {
    /// Sequential index of the tile being processed.
    pub index: usize,
    /// Slots filled so far, counting tiles left by earlier jobs.
    pub sprites_added: usize,
    /// Capacity of the destination store.
    pub max_sprites: usize,
    /// Tiles in the source image.
    pub total_sprites: usize,
}

impl JobContext {
    pub fn new(max_sprites: usize, total_sprites: usize) -> Self {
        Self { index: 0, sprites_added: 0, max_sprites, total_sprites }
    }

    /// Context for a job writing into a store that already holds `filled` tiles.
    pub fn resume(max_sprites: usize, total_sprites: usize, filled: usize) -> Self {
        Self { sprites_added: filled, ..Self::new(max_sprites, total_sprites) }
    }

    pub fn is_full(&self) -> bool {
        self.sprites_added >= self.max_sprites
    }
}

/// Commit one tile.
///
/// In [`CommitMode::Unique`] the tile goes to the store's lowest free slot
/// unless the store already holds identical data. In [`CommitMode::Positional`] it
/// goes to `destination` unless it is empty. Nothing is written once
/// `ctx.sprites_added` has reached `ctx.max_sprites`.
pub fn commit_tile<S: TileStore + ?Sized>(
    store: &mut S,
    ctx: &mut JobContext,
    data: &[i32],
    destination: usize,
    mode: CommitMode,
) -> CommitOutcome {
    if ctx.is_full() {
        return CommitOutcome::CapacityReached;
    }

    let slot = match mode {
        CommitMode::Unique => {
            if let Some(existing) = store.find_exact_match(data) {
                return CommitOutcome::Duplicate(existing);
            }
            match store.first_free_slot() {
                Some(slot) => slot,
                None => return CommitOutcome::CapacityReached,
            }
        }
        CommitMode::Positional => {
            if store.is_empty(data) {
                return CommitOutcome::Empty;
            }
            destination
        }
    };

    if slot >= store.total_capacity() {
        return CommitOutcome::CapacityReached;
    }

    store.write_at(slot, data);
    ctx.sprites_added += 1;
    CommitOutcome::Written(slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chips::SpriteChip;

    fn chip(capacity: usize) -> SpriteChip {
        SpriteChip::new(2, 2, 2 * capacity, 2).with_empty_index(0)
    }

    #[test]
    fn test_unique_skips_duplicates() {
        let mut store = chip(4);
        let mut ctx = JobContext::new(4, 3);

        assert_eq!(commit_tile(&mut store, &mut ctx, &[1, 2, 3, 4], 0, CommitMode::Unique), CommitOutcome::Written(0));
        assert_eq!(commit_tile(&mut store, &mut ctx, &[1, 2, 3, 4], 1, CommitMode::Unique), CommitOutcome::Duplicate(0));
        assert_eq!(commit_tile(&mut store, &mut ctx, &[4, 3, 2, 1], 2, CommitMode::Unique), CommitOutcome::Written(1));
        assert_eq!(ctx.sprites_added, 2);
        assert_eq!(store.committed(), 2);
    }

    #[test]
    fn test_unique_commits_empty_tile_once() {
        let mut store = chip(4);
        let mut ctx = JobContext::new(4, 2);
        assert!(commit_tile(&mut store, &mut ctx, &[0, 0, 0, 0], 0, CommitMode::Unique).is_written());
        assert!(!commit_tile(&mut store, &mut ctx, &[0, 0, 0, 0], 1, CommitMode::Unique).is_written());
        assert_eq!(store.committed(), 1);
    }

    #[test]
    fn test_positional_skips_empty_and_keeps_position() {
        let mut store = chip(4);
        let mut ctx = JobContext::new(4, 4);

        assert_eq!(commit_tile(&mut store, &mut ctx, &[0, 0, 0, 0], 0, CommitMode::Positional), CommitOutcome::Empty);
        assert_eq!(commit_tile(&mut store, &mut ctx, &[1, 0, 0, 0], 1, CommitMode::Positional), CommitOutcome::Written(1));
        assert_eq!(commit_tile(&mut store, &mut ctx, &[1, 0, 0, 0], 3, CommitMode::Positional), CommitOutcome::Written(3));
        assert_eq!(store.sprite_at(0), None);
        assert_eq!(store.sprite_at(1), Some(&[1, 0, 0, 0][..]));
        assert_eq!(store.sprite_at(3), Some(&[1, 0, 0, 0][..]));
        assert_eq!(ctx.sprites_added, 2);
    }

    #[test]
    fn test_no_writes_once_full() {
        for mode in [CommitMode::Unique, CommitMode::Positional] {
            let mut store = chip(2);
            let mut ctx = JobContext::new(2, 3);
            assert!(commit_tile(&mut store, &mut ctx, &[1, 1, 1, 1], 0, mode).is_written());
            assert!(commit_tile(&mut store, &mut ctx, &[2, 2, 2, 2], 1, mode).is_written());
            assert_eq!(
                commit_tile(&mut store, &mut ctx, &[3, 3, 3, 3], 0, mode),
                CommitOutcome::CapacityReached
            );
            assert_eq!(store.find_sprite(&[3, 3, 3, 3]), None);
            assert_eq!(ctx.sprites_added, 2);
        }
    }

    #[test]
    fn test_positional_past_last_slot_not_counted() {
        let mut store = chip(2);
        let mut ctx = JobContext::new(2, 4);
        assert_eq!(
            commit_tile(&mut store, &mut ctx, &[1, 1, 1, 1], 3, CommitMode::Positional),
            CommitOutcome::CapacityReached
        );
        assert_eq!(ctx.sprites_added, 0);
    }

    #[test]
    fn test_unique_fills_gaps_left_by_positional_writes() {
        let mut store = chip(3);
        store.update_sprite_at(1, &[5, 5, 5, 5]);
        let mut ctx = JobContext::resume(3, 2, store.committed());

        assert_eq!(commit_tile(&mut store, &mut ctx, &[1, 1, 1, 1], 0, CommitMode::Unique), CommitOutcome::Written(0));
        assert_eq!(commit_tile(&mut store, &mut ctx, &[2, 2, 2, 2], 1, CommitMode::Unique), CommitOutcome::Written(2));
        assert_eq!(store.committed(), 3);
        assert!(ctx.is_full());
    }

    #[test]
    fn test_mode_from_flag() {
        assert_eq!(CommitMode::from_unique(true), CommitMode::Unique);
        assert_eq!(CommitMode::from_unique(false).to_string(), "non-unique");
    }
}
