//! Force-directed layout and image configuration.

use serde::{Deserialize, Serialize};

/// Fixed parameters of the Eades layout and the rendered canvas.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GraphConfig {
    /// Node repulsion strength. Default: 1.0.
    pub repulsion: Option<f64>,
    /// Step size applied to the net force each update. Default: 0.05.
    pub rate: Option<f64>,
    /// Number of layout updates. Default: 30.
    pub updates: Option<u32>,
    /// Barnes-Hut opening angle. Default: 0.2.
    pub theta: Option<f64>,
    /// Canvas edge length in centimeters. Default: 15.
    pub size_cm: Option<f64>,
    /// Node glyph radius in pixels. Default: 15.
    pub node_radius: Option<u32>,
    /// Label font size in pixels. Default: 18.
    pub font_size: Option<u32>,
}

impl GraphConfig {
    pub fn effective_repulsion(&self) -> f64 {
        self.repulsion.unwrap_or(1.0)
    }

    pub fn effective_rate(&self) -> f64 {
        self.rate.unwrap_or(0.05)
    }

    pub fn effective_updates(&self) -> u32 {
        self.updates.unwrap_or(30)
    }

    pub fn effective_theta(&self) -> f64 {
        self.theta.unwrap_or(0.2)
    }

    pub fn effective_size_cm(&self) -> f64 {
        self.size_cm.unwrap_or(15.0)
    }

    pub fn effective_node_radius(&self) -> u32 {
        self.node_radius.unwrap_or(15)
    }

    pub fn effective_font_size(&self) -> u32 {
        self.font_size.unwrap_or(18)
    }

    /// Canvas edge length in pixels at 96 dpi.
    pub fn canvas_pixels(&self) -> u32 {
        (self.effective_size_cm() / 2.54 * 96.0).round() as u32
    }
}
