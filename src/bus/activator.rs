use crate::error::{OneWireError, Result};
use log::debug;
use std::time::Instant;
use subprocess::{Exec, Redirection};

/// Makes sure the bus master and thermometer drivers are loaded before the
/// device directory is touched.
pub trait BusActivator: Send + Sync {
    fn activate(&self) -> Result<()>;
}

/// Loads kernel modules with `modprobe`, one invocation per module, in order.
#[derive(Debug, Clone)]
pub struct Modprobe {
    modules: Vec<String>,
}

impl Modprobe {
    pub fn new<I, S>(modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            modules: modules.into_iter().map(Into::into).collect(),
        }
    }

    pub fn modules(&self) -> &[String] {
        &self.modules
    }
}

impl Default for Modprobe {
    fn default() -> Self {
        Self::new(["w1_gpio", "w1_therm"])
    }
}

impl BusActivator for Modprobe {
    fn activate(&self) -> Result<()> {
        for module in &self.modules {
            let start = Instant::now();
            let capture = Exec::cmd("modprobe")
                .arg(module)
                .stdout(Redirection::Pipe)
                .stderr(Redirection::Pipe)
                .capture()
                .map_err(|source| OneWireError::ActivationSpawn {
                    module: module.clone(),
                    source,
                })?;

            if !capture.success() {
                return Err(OneWireError::ActivationFailed {
                    module: module.clone(),
                    status: format!("{:?}", capture.exit_status),
                    stderr: capture.stderr_str().trim().to_string(),
                });
            }
            debug!("modprobe {} took: {} ms", module, start.elapsed().as_millis());
        }
        Ok(())
    }
}

/// For hosts where the drivers are built in or loaded at boot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoActivation;

impl BusActivator for NoActivation {
    fn activate(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_modules() {
        let modprobe = Modprobe::default();
        assert_eq!(modprobe.modules(), ["w1_gpio", "w1_therm"]);
    }

    #[test]
    fn test_no_modules_is_noop() {
        let modprobe = Modprobe::new(Vec::<String>::new());
        assert!(modprobe.activate().is_ok());
        assert!(NoActivation.activate().is_ok());
    }
}
