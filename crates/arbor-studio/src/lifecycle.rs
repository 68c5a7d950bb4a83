use std::fmt;

use anyhow::{bail, Result};

/// Loop driver state: `Uninitialized -> Running -> Closed`.
///
/// `R` holds the GPU resources that only exist while running. Closing hands
/// them back so they are released exactly once.
#[derive(Debug)]
pub enum Lifecycle<R> {
    Uninitialized,
    Running(R),
    Closed,
}

impl<R> Lifecycle<R> {
    pub fn new() -> Self {
        Lifecycle::Uninitialized
    }

    /// Enters `Running` with `resources`. Only valid from `Uninitialized`.
    pub fn start(&mut self, resources: R) -> Result<()> {
        match self {
            Lifecycle::Uninitialized => {
                *self = Lifecycle::Running(resources);
                Ok(())
            }
            other => bail!("cannot start: loop is already {other}"),
        }
    }

    /// Enters `Closed` and returns the resources if the loop was running.
    pub fn close(&mut self) -> Option<R> {
        match std::mem::replace(self, Lifecycle::Closed) {
            Lifecycle::Running(resources) => Some(resources),
            _ => None,
        }
    }

    pub fn resources_mut(&mut self) -> Option<&mut R> {
        match self {
            Lifecycle::Running(resources) => Some(resources),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Lifecycle::Running(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Lifecycle::Closed)
    }
}

impl<R> fmt::Display for Lifecycle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Lifecycle::Uninitialized => "uninitialized",
            Lifecycle::Running(_) => "running",
            Lifecycle::Closed => "closed",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_then_closes_once() {
        let mut lc = Lifecycle::new();
        assert!(lc.resources_mut().is_none());

        lc.start(7u32).unwrap();
        assert!(lc.is_running());
        *lc.resources_mut().unwrap() += 1;

        assert_eq!(lc.close(), Some(8));
        assert!(lc.is_closed());
        assert_eq!(lc.close(), None);
    }

    #[test]
    fn cannot_start_twice() {
        let mut lc = Lifecycle::new();
        lc.start("a").unwrap();
        let err = lc.start("b").unwrap_err();
        assert!(err.to_string().contains("running"), "{err}");
        assert_eq!(lc.resources_mut().copied(), Some("a"));
    }

    #[test]
    fn closed_is_terminal() {
        let mut lc: Lifecycle<()> = Lifecycle::new();
        assert_eq!(lc.close(), None);
        assert!(lc.is_closed());
        assert!(lc.start(()).is_err());
        assert!(lc.is_closed());
    }

    #[test]
    fn display_names_states() {
        let mut lc = Lifecycle::new();
        assert_eq!(lc.to_string(), "uninitialized");
        lc.start(()).unwrap();
        assert_eq!(lc.to_string(), "running");
        lc.close();
        assert_eq!(lc.to_string(), "closed");
    }
}
