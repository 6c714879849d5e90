//! Toolpath-command protocol and the simulator aggregate.
//!
//! External collaborators (G-code parsers, planners) reduce their input to
//! this command vocabulary and submit it to a [`Simulator`], which owns
//! exactly one grid, the active tool, and the machine state. Rapid moves
//! reposition without cutting; feed moves sweep the cutter through the
//! stock. The machine state travels as an explicit struct rather than a
//! hidden current-position singleton.

use glam::Vec3;
use web_time::Instant;

use crate::error::Result;
use crate::extract::{extract, ExtractMethod};
use crate::geometry::Aabb;
use crate::mesh::Mesh;
use crate::metrics::MillMetrics;
use crate::stock::Stock;
use crate::tool::Tool;
use crate::voxel_grid::VoxelGrid;

/// Default voxel edge length in millimeters.
pub const DEFAULT_RESOLUTION: f32 = 0.5;

/// Default stock cube edge length in millimeters.
pub const DEFAULT_STOCK_SIZE: f32 = 100.0;

/// Default tool axis (spindle straight down the +Z column).
pub const DEFAULT_TOOL_AXIS: Vec3 = Vec3::Z;

/// Default sub-step count for 5-axis orientation interpolation.
pub const DEFAULT_ORIENTATION_STEPS: usize = 20;

/// 5-axis moves shorter than this update position without cutting.
pub const MIN_FIVE_AXIS_MOTION: f32 = 1.0e-3;

/// One machining command, positions in absolute machine coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToolpathCommand {
  /// Rapid positioning move; no material is removed.
  Rapid { target: Vec3 },
  /// Linear cutting move with the tool axis fixed.
  Linear { target: Vec3 },
  /// Rapid positioning move that also reorients the tool axis.
  Rapid5Axis { target: Vec3, axis: Vec3 },
  /// Linear cutting move with simultaneous axis reorientation.
  Linear5Axis {
    target: Vec3,
    axis: Vec3,
    /// Orientation interpolation sub-steps; defaults to
    /// [`DEFAULT_ORIENTATION_STEPS`].
    steps: Option<usize>,
  },
  /// Clockwise XY arc about `center`, linear Z.
  ArcCw { target: Vec3, center: Vec3 },
  /// Counter-clockwise XY arc about `center`, linear Z.
  ArcCcw { target: Vec3, center: Vec3 },
}

/// Current machine position and tool-axis orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MachineState {
  pub position: Vec3,
  pub axis: Vec3,
}

impl Default for MachineState {
  fn default() -> Self {
    Self {
      position: Vec3::ZERO,
      axis: DEFAULT_TOOL_AXIS,
    }
  }
}

/// Simulation aggregate: one grid, the active tool, and the machine state.
///
/// Construction builds everything; `reset` restores full stock and homes
/// the machine. The grid is exclusively owned for the simulator's
/// lifetime.
#[derive(Clone, Debug)]
pub struct Simulator<S> {
  grid: S,
  tool: Tool,
  state: MachineState,
  metrics: MillMetrics,
}

impl Simulator<VoxelGrid> {
  /// Simulator over the default stock: a 100 mm cube at 0.5 mm resolution.
  pub fn with_default_stock(tool: Tool) -> Result<Self> {
    let bounds = Aabb::new(Vec3::ZERO, Vec3::splat(DEFAULT_STOCK_SIZE));
    Ok(Self::new(VoxelGrid::new(bounds, DEFAULT_RESOLUTION)?, tool))
  }
}

impl<S: Stock> Simulator<S> {
  pub fn new(grid: S, tool: Tool) -> Self {
    Self {
      grid,
      tool,
      state: MachineState::default(),
      metrics: MillMetrics::new(),
    }
  }

  pub fn grid(&self) -> &S {
    &self.grid
  }

  pub fn tool(&self) -> &Tool {
    &self.tool
  }

  pub fn state(&self) -> MachineState {
    self.state
  }

  pub fn metrics(&self) -> &MillMetrics {
    &self.metrics
  }

  /// Swap the active cutter (tool change); position and axis are kept.
  pub fn set_tool(&mut self, tool: Tool) -> Result<()> {
    tool.validate()?;
    self.tool = tool;
    Ok(())
  }

  /// Restore full stock and home the machine state.
  pub fn reset(&mut self) {
    self.grid.reset();
    self.state = MachineState::default();
    self.metrics.clear();
  }

  /// Execute one toolpath command against the grid.
  ///
  /// Geometry never fails: motion outside the stock clips. Errors surface
  /// only for invalid tools.
  pub fn execute(&mut self, command: ToolpathCommand) -> Result<()> {
    self.metrics.commands_executed += 1;
    let start = Instant::now();

    match command {
      ToolpathCommand::Rapid { target } => {
        self.state.position = target;
        return Ok(());
      }
      ToolpathCommand::Rapid5Axis { target, axis } => {
        self.state.position = target;
        self.state.axis = axis.try_normalize().unwrap_or(DEFAULT_TOOL_AXIS);
        return Ok(());
      }
      ToolpathCommand::Linear { target } => {
        self
          .grid
          .cut_linear(&self.tool, self.state.position, target)?;
        self.state.position = target;
      }
      ToolpathCommand::Linear5Axis {
        target,
        axis,
        steps,
      } => {
        let axis = axis.try_normalize().unwrap_or(DEFAULT_TOOL_AXIS);
        if (target - self.state.position).length() < MIN_FIVE_AXIS_MOTION {
          // Sub-threshold motion: position snaps to target, nothing cut.
          self.state.position = target;
          return Ok(());
        }
        self.grid.cut_linear_oriented(
          &self.tool,
          self.state.position,
          target,
          self.state.axis,
          axis,
          Some(steps.unwrap_or(DEFAULT_ORIENTATION_STEPS)),
        )?;
        self.state.position = target;
        self.state.axis = axis;
      }
      ToolpathCommand::ArcCw { target, center } => {
        self
          .grid
          .cut_arc(&self.tool, self.state.position, target, center, true)?;
        self.state.position = target;
      }
      ToolpathCommand::ArcCcw { target, center } => {
        self
          .grid
          .cut_arc(&self.tool, self.state.position, target, center, false)?;
        self.state.position = target;
      }
    }

    self
      .metrics
      .record_cut_timing(start.elapsed().as_micros() as u64);
    Ok(())
  }

  /// Execute a sequence of commands, stopping at the first error.
  pub fn run(&mut self, commands: &[ToolpathCommand]) -> Result<()> {
    for &command in commands {
      self.execute(command)?;
    }
    Ok(())
  }

  /// Extract the current stock surface, recording timing when metrics
  /// collection is enabled.
  pub fn extract_surface(&mut self, method: ExtractMethod) -> Mesh
  where
    S: Sync,
  {
    let start = Instant::now();
    let mesh = extract(&self.grid, method);
    self
      .metrics
      .record_extract_timing(start.elapsed().as_micros() as u64);
    mesh
  }
}

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;
