//! Frame statistics renderer
//!
//! Stands in for a GPU renderer: it keeps the scene registry and the sizes of
//! the HDR target and bloom chain a post-processing pipeline would allocate,
//! and hands a [`FrameReport`] to a [`ReportSink`] after each draw.

use log::{debug, info};
use shard_core::{Result, ShardError, Vec3};
use shard_runtime::{Camera, Renderable, Renderer, Viewport};

/// Maximum number of bloom mip levels in the downsample/upsample chain.
pub const MAX_BLOOM_MIPS: usize = 5;

/// Render target sizes for the post-processing chain, in physical pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFxTargets {
    pub hdr: (u32, u32),
    /// Each level is half the size of the previous
    pub bloom_mips: Vec<(u32, u32)>,
}

impl PostFxTargets {
    pub fn for_viewport(viewport: &Viewport) -> Self {
        let (width, height) = viewport.physical_size();
        let (width, height) = (width.max(1), height.max(1));

        // Smallest mip stays at least 8x8
        let min_dim = width.min(height);
        let max_mips = (min_dim as f32).log2().floor() as usize;
        let count = max_mips.saturating_sub(3).min(MAX_BLOOM_MIPS);

        let mut bloom_mips = Vec::with_capacity(count);
        let (mut mip_w, mut mip_h) = ((width / 2).max(1), (height / 2).max(1));
        for _ in 0..count {
            bloom_mips.push((mip_w, mip_h));
            mip_w = (mip_w / 2).max(1);
            mip_h = (mip_h / 2).max(1);
        }

        Self {
            hdr: (width, height),
            bloom_mips,
        }
    }
}

/// What was drawn in one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub camera_position: Vec3,
    /// Camera yaw in radians
    pub heading: f32,
    pub target: (u32, u32),
    pub renderables: usize,
}

/// Receives a report after every draw
pub trait ReportSink {
    fn report(&mut self, report: &FrameReport);
}

/// Logs every `every`-th frame at debug level
pub struct LogSink {
    pub every: u64,
}

impl ReportSink for LogSink {
    fn report(&mut self, report: &FrameReport) {
        if self.every > 0 && report.frame % self.every == 0 {
            let p = report.camera_position;
            debug!(
                "frame {} camera ({:.1}, {:.1}, {:.1}) heading {:.2} target {}x{}",
                report.frame, p.x, p.y, p.z, report.heading, report.target.0, report.target.1
            );
        }
    }
}

pub struct StatsRenderer {
    sink: Box<dyn ReportSink>,
    viewport: Viewport,
    renderables: Vec<Renderable>,
    post_fx: Option<PostFxTargets>,
    projection: [[f32; 4]; 4],
    frames: u64,
}

impl StatsRenderer {
    pub fn new(viewport: Viewport, sink: Box<dyn ReportSink>) -> Self {
        Self {
            sink,
            viewport,
            renderables: Vec::new(),
            post_fx: None,
            projection: [[0.0; 4]; 4],
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn renderables(&self) -> &[Renderable] {
        &self.renderables
    }

    pub fn post_fx(&self) -> Option<&PostFxTargets> {
        self.post_fx.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Projection captured at the last resize
    pub fn projection(&self) -> [[f32; 4]; 4] {
        self.projection
    }

    fn target_size(&self) -> (u32, u32) {
        match &self.post_fx {
            Some(targets) => targets.hdr,
            None => self.viewport.physical_size(),
        }
    }
}

impl Renderer for StatsRenderer {
    fn init_post_fx(&mut self, viewport: &Viewport) -> Result<()> {
        let targets = PostFxTargets::for_viewport(viewport);
        info!(
            "post-fx enabled: hdr {}x{}, {} bloom mips",
            targets.hdr.0,
            targets.hdr.1,
            targets.bloom_mips.len()
        );
        self.post_fx = Some(targets);
        Ok(())
    }

    fn add_renderable(&mut self, renderable: Renderable) {
        debug!("scene: added '{}'", renderable.name);
        self.renderables.push(renderable);
    }

    fn draw(&mut self, camera: &dyn Camera) -> Result<()> {
        let position = camera.position();
        if !position.is_finite() {
            return Err(ShardError::RenderError(format!(
                "camera position is not finite: {position:?}"
            )));
        }

        self.frames += 1;
        let report = FrameReport {
            frame: self.frames,
            camera_position: position,
            heading: camera.rotation().y,
            target: self.target_size(),
            renderables: self.renderables.len(),
        };
        self.sink.report(&report);
        Ok(())
    }

    fn resize(&mut self, viewport: &Viewport, camera: &dyn Camera) -> Result<()> {
        self.viewport = *viewport;
        self.projection = camera.projection_matrix();
        if self.post_fx.is_some() {
            self.post_fx = Some(PostFxTargets::for_viewport(viewport));
        }
        debug!(
            "renderer resized to {}x{} @ {:.2}",
            viewport.width, viewport.height, viewport.pixel_ratio
        );
        Ok(())
    }
}
