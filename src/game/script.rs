//! Scripted controls for headless sessions

use std::{fs, path::Path};

use serde::Deserialize;

use super::input::ControlState;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("Failed to read input script: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse input script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Input script contains no steps")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct ScriptFile {
    steps: Vec<ScriptStep>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ScriptStep {
    /// Seconds this step is held
    duration: f32,
    #[serde(default)]
    up: bool,
    #[serde(default)]
    down: bool,
    #[serde(default)]
    left: bool,
    #[serde(default)]
    right: bool,
    #[serde(default)]
    release: bool,
    #[serde(default)]
    pointer_x: Option<f32>,
    #[serde(default)]
    pointer_y: Option<f32>,
}

impl ScriptStep {
    fn controls(&self) -> ControlState {
        ControlState {
            up: self.up,
            down: self.down,
            left: self.left,
            right: self.right,
            release: self.release,
            pointer: self.pointer_x.zip(self.pointer_y),
        }
    }
}

/// Plays back timed control steps; the last step holds forever
#[derive(Debug)]
pub struct ScriptedControls {
    steps: Vec<ScriptStep>,
    index: usize,
    time_in_step: f32,
}

impl ScriptedControls {
    pub fn from_path(path: &Path) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, ScriptError> {
        let file: ScriptFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            return Err(ScriptError::Empty);
        }
        Ok(Self {
            steps: file.steps,
            index: 0,
            time_in_step: 0.0,
        })
    }

    /// Advance by `dt` seconds and return the controls now in effect
    pub fn advance(&mut self, dt: f32) -> ControlState {
        self.time_in_step += dt;
        while self.index + 1 < self.steps.len()
            && self.time_in_step >= self.steps[self.index].duration
        {
            self.time_in_step -= self.steps[self.index].duration;
            self.index += 1;
        }

        self.steps
            .get(self.index)
            .map(ScriptStep::controls)
            .unwrap_or_default()
    }
}
