//! Rendering boundary.
//!
//! A [`ChartSurface`] turns a [`Chart`] into a live instance and can dispose of
//! it again. [`ChartSlot`] owns at most one live instance on its surface and
//! always disposes the previous instance before mounting the next one.

use crate::chart::Chart;
use crate::graph;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub trait ChartSurface {
    /// A mounted chart instance
    type Handle;

    fn mount(&mut self, chart: &Chart) -> Result<Self::Handle>;

    fn dispose(&mut self, handle: Self::Handle) -> Result<()>;
}

/// Holder of the single live chart instance of one surface
pub struct ChartSlot<S: ChartSurface> {
    surface: S,
    live: Option<S::Handle>,
}

impl<S: ChartSurface> ChartSlot<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            live: None,
        }
    }

    /// Dispose the live instance, then mount `chart`. When mounting fails the
    /// slot is left empty.
    pub fn replace(&mut self, chart: &Chart) -> Result<&S::Handle> {
        self.clear()?;
        let handle = self.surface.mount(chart)?;
        Ok(self.live.insert(handle))
    }

    /// Dispose the live instance, if any
    pub fn clear(&mut self) -> Result<()> {
        match self.live.take() {
            Some(handle) => self.surface.dispose(handle),
            None => Ok(()),
        }
    }

    pub fn current(&self) -> Option<&S::Handle> {
        self.live.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Give up ownership of the live instance without disposing it
    pub fn detach(mut self) -> Option<S::Handle> {
        self.live.take()
    }
}

impl<S: ChartSurface> Drop for ChartSlot<S> {
    fn drop(&mut self) {
        if let Err(e) = self.clear() {
            warn!("Failed to dispose chart: {:#}", e);
        }
    }
}

/// Draws charts into a PNG file at a fixed path
pub struct PngSurface {
    path: PathBuf,
    width: u32,
    height: u32,
}

impl PngSurface {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChartSurface for PngSurface {
    type Handle = PathBuf;

    fn mount(&mut self, chart: &Chart) -> Result<PathBuf> {
        let png_bytes = graph::render_png(chart, self.width, self.height)?;
        fs::write(&self.path, png_bytes)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        debug!("Mounted {} chart at {}", chart.kind(), self.path.display());
        Ok(self.path.clone())
    }

    fn dispose(&mut self, handle: PathBuf) -> Result<()> {
        match fs::remove_file(&handle) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", handle.display())),
        }
    }
}

/// Writes every mounted chart as one JSON line
pub struct JsonSurface<W: Write> {
    writer: W,
    mounted: usize,
}

impl<W: Write> JsonSurface<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, mounted: 0 }
    }

    /// Number of charts mounted so far
    pub fn mounted(&self) -> usize {
        self.mounted
    }
}

impl<W: Write> ChartSurface for JsonSurface<W> {
    /// Sequence number of the written line
    type Handle = usize;

    fn mount(&mut self, chart: &Chart) -> Result<usize> {
        serde_json::to_writer(&mut self.writer, chart).context("Failed to serialise chart")?;
        writeln!(self.writer).context("Failed to write chart")?;
        self.writer.flush().context("Failed to flush chart output")?;
        self.mounted += 1;
        Ok(self.mounted)
    }

    // an emitted line cannot be taken back
    fn dispose(&mut self, _handle: usize) -> Result<()> {
        Ok(())
    }
}
