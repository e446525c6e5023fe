use std::ops::Range;
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use reachability::{EvaluationMode, GenerateConfig};
use robot_kernel::MockRobot;

/// Compute, cache and plot a manipulator's kinematic reachability map.
#[derive(Parser, Debug, Clone)]
#[command(name = "kinematic-reachability", version)]
pub struct Cli {
    /// Built-in robot to analyze
    #[arg(long, value_enum, default_value_t = RobotPreset::Reference)]
    pub robot: RobotPreset,

    /// Manipulator to analyze
    #[arg(long = "manipname", default_value = "arm")]
    pub manip_name: String,

    /// Radius of the sampled ball in meters (derived from the arm if omitted)
    #[arg(long = "maxradius")]
    pub max_radius: Option<f64>,

    /// Linear sampling step in meters
    #[arg(long = "xyzdelta", default_value_t = 0.04)]
    pub xyz_delta: f64,

    /// Requested angular resolution in radians
    #[arg(long = "quatdelta", default_value_t = 0.5)]
    pub quat_delta: f64,

    /// Density multiplier for visualization
    #[arg(long = "showscale", default_value_t = 1.0)]
    pub show_scale: f64,

    /// Only evaluate the identity orientation
    #[arg(long)]
    pub translation_only: bool,

    /// Spread evaluation across all cores
    #[arg(long)]
    pub parallel: bool,

    /// Generate through the autogeneration policy
    #[arg(long)]
    pub autogenerate: bool,

    /// With --autogenerate, refuse robots without known parameters
    #[arg(long, requires = "autogenerate")]
    pub no_force_generate: bool,

    /// Recompute even if a cache entry exists
    #[arg(long)]
    pub regenerate: bool,

    /// Root directory of the reachability cache
    #[arg(long, env = "REACH_CACHE_DIR", default_value = ".reach-cache")]
    pub cache_dir: PathBuf,

    /// Plot the density field
    #[arg(long)]
    pub show: bool,

    /// Directory plots are written to
    #[arg(long, default_value = "plots")]
    pub plot_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = PlotFormat::Svg)]
    pub plot_format: PlotFormat,

    /// Only plot x-planes START:END of the grid
    #[arg(long, value_name = "START:END", value_parser = parse_range)]
    pub xrange: Option<Range<usize>>,

    /// Draw contours as blocky voxel shells instead of smooth surfaces
    #[arg(long)]
    pub voxel_shells: bool,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotPreset {
    Reference,
    Compact,
}

impl RobotPreset {
    pub fn build(self) -> MockRobot {
        match self {
            RobotPreset::Reference => MockRobot::reference_arm(),
            RobotPreset::Compact => MockRobot::compact_arm(),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotFormat {
    Svg,
    Obj,
}

impl Cli {
    pub fn generate_config(&self) -> GenerateConfig {
        GenerateConfig {
            max_radius: self.max_radius,
            xyz_delta: self.xyz_delta,
            quat_delta: self.quat_delta,
            translation_only: self.translation_only,
            mode: if self.parallel {
                EvaluationMode::Parallel
            } else {
                EvaluationMode::Sequential
            },
            ..GenerateConfig::default()
        }
    }

    /// Default log filter for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

fn parse_range(s: &str) -> Result<Range<usize>, String> {
    let (start, end) = s
        .split_once(':')
        .ok_or_else(|| format!("expected START:END, got {s:?}"))?;
    let start: usize = start.trim().parse().map_err(|e| format!("bad start: {e}"))?;
    let end: usize = end.trim().parse().map_err(|e| format!("bad end: {e}"))?;
    if end <= start {
        return Err(format!("empty range {start}:{end}"));
    }
    Ok(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["kinematic-reachability"]).unwrap();
        assert_eq!(cli.robot, RobotPreset::Reference);
        assert_eq!(cli.manip_name, "arm");
        assert_eq!(cli.xyz_delta, 0.04);
        assert_eq!(cli.quat_delta, 0.5);
        assert_eq!(cli.show_scale, 1.0);
        assert_eq!(cli.plot_format, PlotFormat::Svg);
        assert!(!cli.voxel_shells);
        assert_eq!(cli.log_level(), "warn");
        assert_eq!(cli.generate_config(), GenerateConfig::default());
    }

    #[test]
    fn flags_map_into_config() {
        let cli = Cli::try_parse_from([
            "kinematic-reachability",
            "--robot",
            "compact",
            "--maxradius",
            "0.8",
            "--xyzdelta",
            "0.1",
            "--translation-only",
            "--parallel",
            "-vv",
        ])
        .unwrap();
        let config = cli.generate_config();
        assert_eq!(config.max_radius, Some(0.8));
        assert_eq!(config.xyz_delta, 0.1);
        assert!(config.translation_only);
        assert_eq!(config.mode, EvaluationMode::Parallel);
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn no_force_requires_autogenerate() {
        assert!(Cli::try_parse_from(["kinematic-reachability", "--no-force-generate"]).is_err());
        let cli = Cli::try_parse_from([
            "kinematic-reachability",
            "--autogenerate",
            "--no-force-generate",
        ])
        .unwrap();
        assert!(cli.autogenerate && cli.no_force_generate);
    }

    #[test]
    fn xrange_parsing() {
        assert_eq!(parse_range("3:7"), Ok(3..7));
        assert!(parse_range("7:3").is_err());
        assert!(parse_range("3").is_err());
        let cli = Cli::try_parse_from(["kinematic-reachability", "--xrange", "10:20"]).unwrap();
        assert_eq!(cli.xrange, Some(10..20));
    }
}
