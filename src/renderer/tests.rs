// src/renderer/tests.rs

use super::*;
use crate::config::{FontConfig, LayoutConfig};
use crate::frame::Frame;
use test_log::test;

fn history_of(frames: Vec<Frame>) -> History {
    let mut history = History::default();
    for frame in frames {
        history.append(frame).unwrap();
    }
    history
}

fn fill_rects(commands: &[RenderCommand]) -> Vec<&RenderCommand> {
    commands
        .iter()
        .filter(|c| matches!(c, RenderCommand::FillRect { .. }))
        .collect()
}

fn texts(commands: &[RenderCommand]) -> Vec<(i32, i32, &str)> {
    commands
        .iter()
        .filter_map(|c| match c {
            RenderCommand::DrawText { x, y, text, .. } => Some((*x, *y, text.as_str())),
            _ => None,
        })
        .collect()
}

#[test]
fn empty_history_clears_and_presents_only() {
    let renderer = Renderer::new(&ViewerConfig::default());
    let commands = renderer.prepare(&History::default());
    assert_eq!(
        commands,
        vec![
            RenderCommand::ClearAll {
                bg: Rgb(240, 248, 255)
            },
            RenderCommand::PresentFrame,
        ]
    );
}

#[test]
fn frame_starts_with_clear_and_ends_with_present() {
    let renderer = Renderer::new(&ViewerConfig::default());
    let history = history_of(vec![Frame::from_rows("m", ["ab"]).unwrap()]);
    let commands = renderer.prepare(&history);
    assert!(matches!(commands.first(), Some(RenderCommand::ClearAll { .. })));
    assert_eq!(commands.last(), Some(&RenderCommand::PresentFrame));
    assert_eq!(
        commands
            .iter()
            .filter(|c| **c == RenderCommand::PresentFrame)
            .count(),
        1
    );
}

#[test]
fn status_line_is_drawn_at_top_left() {
    let renderer = Renderer::new(&ViewerConfig::default());
    let history = history_of(vec![
        Frame::from_rows("first", ["--"]).unwrap(),
        Frame::from_rows("second", ["--"]).unwrap(),
    ]);
    let commands = renderer.prepare(&history);
    assert_eq!(
        commands[1],
        RenderCommand::DrawText {
            x: 2,
            y: 2,
            text: "Index 1 / 2: first".to_string(),
            color: Rgb::BLACK,
        }
    );
}

#[test]
fn every_cell_gets_border_and_fill_but_only_filled_cells_get_glyphs() {
    let renderer = Renderer::new(&ViewerConfig::default());
    let history = history_of(vec![Frame::from_rows("", ["a-c", "-e-"]).unwrap()]);
    let commands = renderer.prepare(&history);

    assert_eq!(fill_rects(&commands).len(), 2 * 3 * 2);
    let glyphs: Vec<&str> = texts(&commands).into_iter().skip(1).map(|t| t.2).collect();
    assert_eq!(glyphs, vec!["a", "c", "e"]);
}

#[test]
fn cell_geometry_matches_default_layout() {
    let renderer = Renderer::new(&ViewerConfig::default());
    // Font 12px: cell pitch 14, grid origin (1, 22).
    let history = history_of(vec![Frame::from_rows("", ["--", "-x"]).unwrap()]);
    let commands = renderer.prepare(&history);
    let rects = fill_rects(&commands);

    // Cell (1, 1): border then inner fill.
    assert_eq!(
        *rects[6],
        RenderCommand::FillRect {
            x: 15,
            y: 36,
            width: 15,
            height: 15,
            color: Rgb::BLACK,
        }
    );
    assert_eq!(
        *rects[7],
        RenderCommand::FillRect {
            x: 16,
            y: 37,
            width: 13,
            height: 13,
            color: Rgb::LAVENDER,
        }
    );
    // Cell (0, 0) inner fill is the empty colour.
    assert_eq!(
        *rects[1],
        RenderCommand::FillRect {
            x: 2,
            y: 23,
            width: 13,
            height: 13,
            color: Rgb::WHITE,
        }
    );
    assert_eq!(texts(&commands)[1], (18, 37, "x"));
}

#[test]
fn layout_follows_configuration() {
    let config = ViewerConfig {
        font: FontConfig {
            size_px: 20,
            ..FontConfig::default()
        },
        layout: LayoutConfig {
            grid_origin_x: 5,
            grid_top_margin: 0,
            cell_padding: 4,
            ..LayoutConfig::default()
        },
        ..ViewerConfig::default()
    };
    let renderer = Renderer::new(&config);
    let history = history_of(vec![Frame::from_rows("", ["--"]).unwrap()]);
    let commands = renderer.prepare(&history);
    let rects = fill_rects(&commands);
    assert_eq!(
        *rects[2],
        RenderCommand::FillRect {
            x: 29,
            y: 20,
            width: 25,
            height: 25,
            color: Rgb::BLACK,
        }
    );
}

#[test]
fn renders_frame_under_cursor() {
    let renderer = Renderer::new(&ViewerConfig::default());
    let mut history = history_of(vec![
        Frame::from_rows("one", ["1"]).unwrap(),
        Frame::from_rows("two", ["2"]).unwrap(),
    ]);
    history.navigate(crate::history::Navigation::Last);
    let commands = renderer.prepare(&history);
    let t = texts(&commands);
    assert_eq!(t[0].2, "Index 2 / 2: two");
    assert_eq!(t[1].2, "2");
}
