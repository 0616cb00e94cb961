// src/main.rs

use std::path::PathBuf;

use anyhow::Context;
use grid_viewer::frame::CellKind;
use grid_viewer::{Frame, Viewer, ViewerConfig};
use log::{info, warn};

/// Side length of the demo grid.
const DEMO_SIZE: usize = 12;

/// Main entry point: records a flood fill across a small grid and opens the
/// viewer on it.
///
/// Usage: `grid-viewer [config.json]`
fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting grid-viewer...");

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => ViewerConfig::load(&path)?,
        None => {
            info!("No configuration file given, using defaults.");
            ViewerConfig::default()
        }
    };

    let mut viewer = Viewer::new(config);
    for frame in flood_fill_frames(DEMO_SIZE)? {
        viewer.append(frame)?;
    }
    if viewer.history().is_empty() {
        warn!("No frames recorded; the window will be blank.");
    }

    viewer.run().context("Viewer session failed")?;
    info!("grid-viewer exited cleanly.");
    Ok(())
}

/// Breadth-first fill from the top-left corner around a wall, one frame per
/// wavefront. Cells are labelled with their distance mod 10.
fn flood_fill_frames(size: usize) -> anyhow::Result<Vec<Frame>> {
    let mut frame = Frame::blank(size, size);
    for row in 0..size {
        for col in 0..size {
            let wall = col == size / 2 && row < size - 2;
            frame.set_cell(row, col, if wall { '#' } else { '-' })?;
        }
    }

    let mut frames = vec![frame.clone().with_message("initial grid")];
    let mut wavefront = vec![(0usize, 0usize)];
    let mut distance = 0usize;
    frame.set_cell(0, 0, '0')?;

    while !wavefront.is_empty() {
        frames.push(
            frame
                .clone()
                .with_message(format!("distance {}: {} cell(s)", distance, wavefront.len())),
        );
        distance += 1;
        let label = char::from_digit((distance % 10) as u32, 10).unwrap_or('?');
        let mut next = Vec::new();
        for (row, col) in wavefront {
            let neighbours = [
                row.checked_sub(1).map(|r| (r, col)),
                (row + 1 < size).then(|| (row + 1, col)),
                col.checked_sub(1).map(|c| (row, c)),
                (col + 1 < size).then(|| (row, col + 1)),
            ];
            for (r, c) in neighbours.into_iter().flatten() {
                if frame.cell(r, c) == Some(CellKind::Empty) {
                    frame.set_cell(r, c, label)?;
                    next.push((r, c));
                }
            }
        }
        wavefront = next;
    }

    frames.push(frame.with_message("done"));
    Ok(frames)
}
