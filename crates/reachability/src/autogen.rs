//! Generation policy for robots without a cached model.

use file_format::CacheStore;
use robot_kernel::{IkSolver, RotationSampler, Scene};
use tracing::{info, instrument};

use crate::config::GenerateConfig;
use crate::error::ReachError;
use crate::guard::BodiesDisabledGuard;
use crate::model::{GenerationSummary, ReachabilityModel};

/// Parameters known to work well for a specific robot and manipulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnownConfig {
    pub robot_hash: &'static str,
    pub manipulator: &'static str,
    pub max_radius: f64,
}

pub const KNOWN_CONFIGS: &[KnownConfig] = &[KnownConfig {
    robot_hash: "409764e862c254605cafb9de013eb531",
    manipulator: "arm",
    max_radius: 1.1,
}];

pub fn known_config(robot_hash: &str, manipulator: &str) -> Option<&'static KnownConfig> {
    KNOWN_CONFIGS
        .iter()
        .find(|k| k.robot_hash == robot_hash && k.manipulator == manipulator)
}

impl ReachabilityModel {
    /// Generate with the robot alone in the scene and save the result.
    ///
    /// A known robot uses its tabulated radius, overriding `config.max_radius`.
    /// An unknown robot is generated with `config` only when `force_generate`
    /// is set; otherwise the call fails with
    /// [`ReachError::NoAutogenerationParameters`].
    #[instrument(skip_all, fields(robot = %self.robot_hash(), manip = %self.manipulator().name))]
    pub fn autogenerate<S, I>(
        &mut self,
        scene: &mut S,
        solver: &I,
        sampler: &dyn RotationSampler,
        store: &CacheStore,
        config: &GenerateConfig,
        force_generate: bool,
    ) -> Result<GenerationSummary, ReachError>
    where
        S: Scene + ?Sized,
        I: IkSolver + Sync + ?Sized,
    {
        self.autogenerate_with(scene, store, config, force_generate, |model, scene, config| {
            model.generate(scene, solver, sampler, config)
        })
    }

    /// [`autogenerate`](Self::autogenerate) for solvers that are not `Sync`.
    #[instrument(skip_all, fields(robot = %self.robot_hash(), manip = %self.manipulator().name))]
    pub fn autogenerate_sequential<S, I>(
        &mut self,
        scene: &mut S,
        solver: &I,
        sampler: &dyn RotationSampler,
        store: &CacheStore,
        config: &GenerateConfig,
        force_generate: bool,
    ) -> Result<GenerationSummary, ReachError>
    where
        S: Scene + ?Sized,
        I: IkSolver + ?Sized,
    {
        self.autogenerate_with(scene, store, config, force_generate, |model, scene, config| {
            model.generate_sequential(scene, solver, sampler, config)
        })
    }

    fn autogenerate_with<S, F>(
        &mut self,
        scene: &mut S,
        store: &CacheStore,
        config: &GenerateConfig,
        force_generate: bool,
        run: F,
    ) -> Result<GenerationSummary, ReachError>
    where
        S: Scene + ?Sized,
        F: FnOnce(&mut Self, &mut S, &GenerateConfig) -> Result<GenerationSummary, ReachError>,
    {
        let mut scene = BodiesDisabledGuard::new(scene);

        let config = match known_config(self.robot_hash(), &self.manipulator().name) {
            Some(known) => {
                info!(radius = known.max_radius, "using known autogeneration parameters");
                GenerateConfig {
                    max_radius: Some(known.max_radius),
                    ..config.clone()
                }
            }
            None if force_generate => config.clone(),
            None => {
                return Err(ReachError::NoAutogenerationParameters {
                    robot_hash: self.robot_hash().to_string(),
                    manipulator: self.manipulator().name.clone(),
                })
            }
        };

        let summary = run(self, &mut *scene, &config)?;
        drop(scene);
        self.save(store)?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robot_kernel::REFERENCE_ARM_HASH;

    #[test]
    fn reference_arm_is_known() {
        let known = known_config(REFERENCE_ARM_HASH, "arm").unwrap();
        assert_eq!(known.max_radius, 1.1);
    }

    #[test]
    fn lookup_needs_both_hash_and_manipulator() {
        assert!(known_config(REFERENCE_ARM_HASH, "leftarm").is_none());
        assert!(known_config("0000", "arm").is_none());
    }
}
