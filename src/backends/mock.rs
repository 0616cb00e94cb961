// src/backends/mock.rs

use crate::backends::{BackendEvent, Driver, RenderCommand};
use anyhow::{anyhow, Result};
use std::collections::VecDeque;

/// Test driver: hands out queued events one batch per `process_events` call
/// and records everything it is asked to draw.
pub struct MockDriver {
    batches: VecDeque<Vec<BackendEvent>>,
    render_commands: Vec<RenderCommand>,
    presents: usize,
    cleanups: usize,
    title: Option<String>,
    failing_renders: usize, // upcoming execute_render_commands calls that error
}

impl MockDriver {
    pub fn new() -> Self {
        Self {
            batches: VecDeque::new(),
            render_commands: Vec::new(),
            presents: 0,
            cleanups: 0,
            title: None,
            failing_renders: 0,
        }
    }

    /// Queues events delivered together by the next `process_events` call.
    pub fn push_batch(&mut self, events: Vec<BackendEvent>) {
        self.batches.push_back(events);
    }

    pub fn push_event(&mut self, event: BackendEvent) {
        self.push_batch(vec![event]);
    }

    /// Makes the next `count` render batches fail before drawing anything.
    pub fn fail_renders(&mut self, count: usize) {
        self.failing_renders = count;
    }

    pub fn render_commands(&self) -> &[RenderCommand] {
        &self.render_commands
    }

    pub fn take_render_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.render_commands)
    }

    pub fn presents(&self) -> usize {
        self.presents
    }

    pub fn cleanups(&self) -> usize {
        self.cleanups
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

impl Driver for MockDriver {
    fn process_events(&mut self) -> Result<Vec<BackendEvent>> {
        Ok(self.batches.pop_front().unwrap_or_default())
    }

    fn execute_render_commands(&mut self, commands: Vec<RenderCommand>) -> Result<()> {
        if self.failing_renders > 0 {
            self.failing_renders -= 1;
            return Err(anyhow!("mock render failure"));
        }
        for command in commands {
            if command == RenderCommand::PresentFrame {
                self.present()?;
            }
            self.render_commands.push(command);
        }
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.presents += 1;
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn cleanup(&mut self) -> Result<()> {
        self.cleanups += 1;
        Ok(())
    }
}
