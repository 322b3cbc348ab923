//! Parallel row dispatch.
//!
//! The image is split into chunks of whole rows. Each chunk is one rayon task
//! that shades its rows, then folds its ray count into the shared counters
//! once and advances the rows-completed counter by its row count. Chunks never
//! overlap, so the pixel buffer needs no locking.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::error::{RenderError, RenderResult};
use crate::integrator::render_pixel;
use crate::progress::{poll_until_complete, ProgressSink, StderrProgress};
use crate::{Color, ImageBuffer, RayGenerator, RenderConfig, Scene, Tracer};

/// Telemetry for one render: total rays traced and rows finished.
///
/// Both only grow during a render and are safe to read from any thread.
/// Each render gets its own set; pass one to
/// [`Renderer::render_with_counters`] to watch a render from outside.
#[derive(Debug, Default)]
pub struct RenderCounters {
    pub(crate) rays_traced: AtomicU64,
    pub(crate) rows_completed: AtomicU32,
}

impl RenderCounters {
    pub fn rays_traced(&self) -> u64 {
        self.rays_traced.load(Ordering::Relaxed)
    }

    pub fn rows_completed(&self) -> u32 {
        self.rows_completed.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.rays_traced.store(0, Ordering::Relaxed);
        self.rows_completed.store(0, Ordering::Release);
    }
}

/// Run `shade_row` over every row of `buffer` in parallel chunks.
///
/// `buffer` is row-major with `width` elements per row. `shade_row` receives
/// the buffer row index and that row's slice, and returns the number of rays
/// it traced. Runs on the current rayon pool.
pub fn dispatch_rows<T, F>(buffer: &mut [T], width: usize, chunk_rows: usize, counters: &RenderCounters, shade_row: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) -> u64 + Sync,
{
    if width == 0 || buffer.is_empty() {
        return;
    }
    let chunk_rows = chunk_rows.max(1);

    buffer
        .par_chunks_mut(width * chunk_rows)
        .enumerate()
        .for_each(|(chunk_index, chunk)| {
            let first_row = chunk_index * chunk_rows;
            let mut rays = 0u64;
            let mut rows = 0u32;

            for (offset, row) in chunk.chunks_mut(width).enumerate() {
                rays += shade_row(first_row + offset, row);
                rows += 1;
            }

            counters.rays_traced.fetch_add(rays, Ordering::Relaxed);
            counters.rows_completed.fetch_add(rows, Ordering::Release);
        });
}

/// Seed for the generator that shades buffer row `row`.
#[inline]
fn row_seed(seed: u64, row: usize) -> u64 {
    seed ^ (row as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Result of a finished render.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// Linear radiance, unsanitized
    pub image: ImageBuffer,
    pub rays_traced: u64,
    pub rows_completed: u32,
    pub elapsed: Duration,
}

impl RenderOutput {
    pub fn mrays_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.rays_traced as f64 / secs / 1.0e6
        } else {
            0.0
        }
    }
}

/// Sets the flag when dropped, so the progress poller stops even if a
/// worker panics.
struct StopOnDrop<'a>(&'a AtomicBool);

impl Drop for StopOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

/// Drives a full render over a dedicated worker pool.
///
/// A renderer may run several renders at once from different threads; they
/// share the pool but not their counters.
pub struct Renderer {
    config: RenderConfig,
    pool: rayon::ThreadPool,
}

impl Renderer {
    pub fn new(mut config: RenderConfig) -> RenderResult<Self> {
        config.validate()?;

        let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("rtw-worker-{i}"));
        if let Some(threads) = config.threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build()?;
        log::debug!("render pool with {} threads", pool.current_num_threads());

        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render `scene` through `camera`, reporting progress to stderr if enabled.
    pub fn render(&self, scene: &Scene, camera: &dyn RayGenerator) -> RenderResult<RenderOutput> {
        if self.config.report_progress {
            self.render_with_progress(scene, camera, Some(&mut StderrProgress))
        } else {
            self.render_with_progress(scene, camera, None)
        }
    }

    /// Render with an explicit progress sink, or none.
    pub fn render_with_progress(
        &self,
        scene: &Scene,
        camera: &dyn RayGenerator,
        sink: Option<&mut dyn ProgressSink>,
    ) -> RenderResult<RenderOutput> {
        self.render_with_counters(scene, camera, &RenderCounters::default(), sink)
    }

    /// Render while updating caller-owned `counters`.
    ///
    /// The counters are reset first. Sharing one set between renders that run
    /// at the same time mixes their totals.
    pub fn render_with_counters(
        &self,
        scene: &Scene,
        camera: &dyn RayGenerator,
        counters: &RenderCounters,
        sink: Option<&mut dyn ProgressSink>,
    ) -> RenderResult<RenderOutput> {
        let config = &self.config;
        let (width, height) = (config.width, config.height);
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        if !scene.is_built() {
            return Err(RenderError::AccelerationStructureNotBuilt(scene.len()));
        }

        log::info!(
            "rendering {}x{} at {} spp, {} primitives, chunks of {} rows",
            width,
            height,
            config.samples_per_pixel,
            scene.len(),
            config.chunk_rows
        );

        counters.reset();
        let mut image = ImageBuffer::new(width, height);
        let stop = AtomicBool::new(false);
        let start = Instant::now();

        std::thread::scope(|s| {
            if let Some(sink) = sink {
                let stop = &stop;
                let interval = config.progress_interval();
                s.spawn(move || poll_until_complete(counters, height, interval, stop, sink));
            }
            let _stop = StopOnDrop(&stop);

            self.pool.install(|| {
                dispatch_rows(
                    &mut image.pixels,
                    width as usize,
                    config.chunk_rows as usize,
                    counters,
                    |row, pixels| self.shade_row(scene, camera, row, pixels),
                )
            });
        });

        let elapsed = start.elapsed();
        let output = RenderOutput {
            image,
            rays_traced: counters.rays_traced(),
            rows_completed: counters.rows_completed(),
            elapsed,
        };
        log::info!(
            "traced {} rays in {:.2}s ({:.2} MRays/s)",
            output.rays_traced,
            elapsed.as_secs_f64(),
            output.mrays_per_second()
        );
        Ok(output)
    }

    /// Shade one buffer row. Buffer row 0 is the top of the image, which is
    /// camera scanline `height - 1`.
    fn shade_row(&self, scene: &Scene, camera: &dyn RayGenerator, row: usize, pixels: &mut [Color]) -> u64 {
        let config = &self.config;
        let j = config.height - 1 - row as u32;

        let mut rng = SmallRng::seed_from_u64(row_seed(config.seed, row));
        let mut tracer = Tracer::new(scene, &mut rng, config.depth_limits(), config.sky);

        for (i, pixel) in pixels.iter_mut().enumerate() {
            *pixel = render_pixel(
                &mut tracer,
                camera,
                i as u32,
                j,
                config.width,
                config.height,
                config.samples_per_pixel,
            );
        }
        tracer.rays_traced()
    }
}
