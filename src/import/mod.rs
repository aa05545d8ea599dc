//! Importing images into palette and sprite chips.
//!
//! An import job runs a fixed sequence of stages over one source image:
//! - reconcile the image palette against the destination palette
//! - rewrite every pixel as an index into the reconciled palette
//! - size the job against the sprite chip
//! - cut the indexed image into tiles and commit them
//! - persist the reconciled palette and finish the report
//!
//! Overflow of either chip never fails a job. Dropped colors and unwritten
//! tiles are counted in the returned [`ImportReport`].

mod error;
pub mod indexer;
pub mod palette;
pub mod source;
pub mod steps;
pub mod tiles;
pub mod writer;

use log::{debug, info, warn};
use serde::Serialize;

pub use error::ImportError;
pub use indexer::index_pixels;
pub use palette::{reconcile, ColorMap, Reconciliation};
pub use source::SourceImage;
pub use steps::Steps;
pub use tiles::IndexedImage;
pub use writer::{commit_tile, CommitMode, CommitOutcome, JobContext};

use crate::chips::{ChipSet, TileStore};
use crate::color::Color;

/// Where a job is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Init,
    Reconciled,
    Indexed,
    Extracting,
    Done,
}

/// Options for one import job.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Commit policy; `None` uses the sprite chip's unique flag.
    pub mode: Option<CommitMode>,
    /// Write the reconciled palette back into the reference color chip.
    pub write_palette: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self { mode: None, write_palette: true }
    }
}

/// Outcome of an import job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Color of every destination slot after reconciliation.
    pub color_map: ColorMap,
    /// New colors that were given a palette slot.
    pub orphans_admitted: Vec<Color>,
    /// New colors that found no free palette slot.
    pub orphans_dropped: Vec<Color>,
    /// Pixels whose color is not in the color map.
    pub undefined_pixels: usize,
    /// Defined pixel indices at or above the chip's colors per sprite.
    pub out_of_range_indices: usize,
    /// Whole tiles in the source image.
    pub tiles_total: usize,
    pub tiles_committed: usize,
    pub duplicates_skipped: usize,
    pub empty_skipped: usize,
    /// Tiles not written because the sprite chip had no room for them.
    pub tiles_unwritten: usize,
}

impl ImportReport {
    /// True when no color or tile was lost.
    pub fn is_lossless(&self) -> bool {
        self.orphans_dropped.is_empty() && self.tiles_unwritten == 0
    }
}

/// State shared by the stages of one job.
struct ImportContext<'a> {
    chips: &'a mut ChipSet,
    image: &'a SourceImage,
    options: ImportOptions,
    state: JobState,
    mode: CommitMode,
    colors_per_sprite: usize,
    indexed: Option<IndexedImage>,
    job: JobContext,
    report: ImportReport,
}

/// One image imported into one chip set.
///
/// ```
/// use tilechip::chips::{ChipSet, ColorChip, SpriteChip};
/// use tilechip::color::{Color, DEFAULT_MASK_COLOR};
/// use tilechip::import::{ImportJob, ImportOptions, SourceImage};
///
/// let black = Color::new(0, 0, 0);
/// let mut chips = ChipSet::new(
///     ColorChip::from_colors(&[black], 4, DEFAULT_MASK_COLOR),
///     SpriteChip::new(2, 2, 8, 8),
/// );
/// let image = SourceImage::new(4, 2, vec![black; 8]).unwrap();
/// let report = ImportJob::new(&mut chips, &image, ImportOptions::default())
///     .unwrap()
///     .run()
///     .unwrap();
/// assert_eq!(report.tiles_total, 2);
/// assert_eq!(report.tiles_committed, 1);
/// assert_eq!(report.duplicates_skipped, 1);
/// ```
pub struct ImportJob<'a> {
    ctx: ImportContext<'a>,
    steps: Steps<ImportContext<'a>, ImportError>,
}

impl<'a> ImportJob<'a> {
    /// Prepare a job. Fails only if the sprite chip has a zero tile size.
    pub fn new(
        chips: &'a mut ChipSet,
        image: &'a SourceImage,
        options: ImportOptions,
    ) -> Result<Self, ImportError> {
        let sprite_chip = &chips.sprite_chip;
        if sprite_chip.tile_width() == 0 || sprite_chip.tile_height() == 0 {
            return Err(ImportError::InvalidTileSize {
                width: sprite_chip.tile_width(),
                height: sprite_chip.tile_height(),
            });
        }

        let mode = options.mode.unwrap_or_else(|| CommitMode::from_unique(sprite_chip.unique()));
        let steps = Steps::new()
            .then("reconcile palette", reconcile_palette)
            .then("index pixels", index_image)
            .then("prepare sprites", prepare_sprites)
            .then("cut out sprites", cut_out_sprites)
            .then("post cut out sprites", post_cut_out_sprites);

        Ok(Self {
            ctx: ImportContext {
                chips,
                image,
                options,
                state: JobState::Init,
                mode,
                colors_per_sprite: 0,
                indexed: None,
                job: JobContext::default(),
                report: ImportReport::default(),
            },
            steps,
        })
    }

    pub fn state(&self) -> JobState {
        self.ctx.state
    }

    pub fn mode(&self) -> CommitMode {
        self.ctx.mode
    }

    pub fn progress(&self) -> f32 {
        self.steps.progress()
    }

    /// Run a single stage. Returns `Ok(false)` once the job is done.
    pub fn next_step(&mut self) -> Result<bool, ImportError> {
        self.steps.next_step(&mut self.ctx)
    }

    /// Run every remaining stage and return the report.
    pub fn run(mut self) -> Result<ImportReport, ImportError> {
        self.steps.run(&mut self.ctx)?;
        Ok(self.ctx.report)
    }
}

/// Import `image` into `chips` in one call.
pub fn import_image(
    chips: &mut ChipSet,
    image: &SourceImage,
    options: ImportOptions,
) -> Result<ImportReport, ImportError> {
    ImportJob::new(chips, image, options)?.run()
}

fn reconcile_palette(ctx: &mut ImportContext<'_>) -> Result<(), ImportError> {
    let reference = ctx.chips.reference_colors();
    let result = reconcile(&reference, ctx.image.palette(), ctx.chips.mask_color());

    if !result.dropped.is_empty() {
        warn!(
            "palette full: {} of {} new colors dropped ({} slots in use)",
            result.dropped.len(),
            result.dropped.len() + result.admitted.len(),
            reference.len()
        );
    }
    debug!(
        "reconciled {} palette slots, {} new colors admitted",
        reference.len(),
        result.admitted.len()
    );

    ctx.report.color_map = result.color_map;
    ctx.report.orphans_admitted = result.admitted;
    ctx.report.orphans_dropped = result.dropped;
    ctx.state = JobState::Reconciled;
    Ok(())
}

fn index_image(ctx: &mut ImportContext<'_>) -> Result<(), ImportError> {
    let sprite_chip = &ctx.chips.sprite_chip;
    let pixels = index_pixels(ctx.image.pixels(), &ctx.report.color_map);
    let indexed = IndexedImage::new(
        ctx.image.width(),
        ctx.image.height(),
        pixels,
        sprite_chip.tile_width(),
        sprite_chip.tile_height(),
    );

    ctx.report.undefined_pixels = indexed.pixels().iter().filter(|&&i| i < 0).count();
    ctx.report.out_of_range_indices = indexed.count_out_of_range(sprite_chip.colors_per_tile());
    if ctx.report.out_of_range_indices > 0 {
        warn!(
            "{} pixels use color indices beyond the {} colors per sprite; stored unchanged",
            ctx.report.out_of_range_indices,
            sprite_chip.colors_per_tile()
        );
    }

    ctx.indexed = Some(indexed);
    ctx.state = JobState::Indexed;
    Ok(())
}

fn prepare_sprites(ctx: &mut ImportContext<'_>) -> Result<(), ImportError> {
    let sprite_chip = &ctx.chips.sprite_chip;
    ctx.colors_per_sprite = sprite_chip.colors_per_tile();
    let total_sprites = ctx.indexed.as_ref().map_or(0, |i| i.total_tiles());
    // unique jobs count tiles left by earlier jobs against capacity
    let filled = match ctx.mode {
        CommitMode::Unique => sprite_chip.committed(),
        CommitMode::Positional => 0,
    };
    ctx.job = JobContext::resume(sprite_chip.total_capacity(), total_sprites, filled);
    ctx.report.tiles_total = total_sprites;

    debug!(
        "{} tiles to cut, chip holds {} ({} mode)",
        total_sprites, ctx.job.max_sprites, ctx.mode
    );
    Ok(())
}

fn cut_out_sprites(ctx: &mut ImportContext<'_>) -> Result<(), ImportError> {
    ctx.state = JobState::Extracting;
    let Some(indexed) = ctx.indexed.as_ref() else {
        return Ok(());
    };

    let total = ctx.job.total_sprites;
    for i in 0..total {
        ctx.job.index = i;
        if ctx.job.is_full() {
            ctx.report.tiles_unwritten += total - i;
            break;
        }

        let Some(data) = indexed.tile_data(i, ctx.colors_per_sprite) else {
            break;
        };

        match commit_tile(&mut ctx.chips.sprite_chip, &mut ctx.job, &data, i, ctx.mode) {
            CommitOutcome::Written(_) => ctx.report.tiles_committed += 1,
            CommitOutcome::Duplicate(_) => ctx.report.duplicates_skipped += 1,
            CommitOutcome::Empty => ctx.report.empty_skipped += 1,
            CommitOutcome::CapacityReached => ctx.report.tiles_unwritten += 1,
        }
    }

    if ctx.report.tiles_unwritten > 0 {
        warn!(
            "sprite chip full: {} of {} tiles not written",
            ctx.report.tiles_unwritten, total
        );
    }
    Ok(())
}

fn post_cut_out_sprites(ctx: &mut ImportContext<'_>) -> Result<(), ImportError> {
    if ctx.options.write_palette {
        let target = match ctx.chips.color_map_chip.as_mut() {
            Some(chip) => chip,
            None => &mut ctx.chips.color_chip,
        };
        for (i, &color) in ctx.report.color_map.colors().iter().enumerate() {
            target.update_color_at(i, color);
        }
    }

    ctx.indexed = None;
    ctx.state = JobState::Done;
    info!(
        "imported {}x{} image: {} tiles committed, {} duplicates, {} empty, {} unwritten",
        ctx.image.width(),
        ctx.image.height(),
        ctx.report.tiles_committed,
        ctx.report.duplicates_skipped,
        ctx.report.empty_skipped,
        ctx.report.tiles_unwritten
    );
    Ok(())
}
