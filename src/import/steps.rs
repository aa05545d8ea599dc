//! Sequential runner for named processing stages
//!
//! A job is a fixed, ordered list of stage functions over one context value.
//! Stages run exactly once each, in order; the first error stops the run.

use log::debug;

/// A stage: mutates the job context, may fail.
pub type StepFn<C, E> = fn(&mut C) -> Result<(), E>;

pub struct Steps<C, E> {
    steps: Vec<(&'static str, StepFn<C, E>)>,
    current: usize,
}

impl<C, E> Default for Steps<C, E> {
    fn default() -> Self {
        Self { steps: Vec::new(), current: 0 }
    }
}

impl<C, E> Steps<C, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage (builder style).
    pub fn then(mut self, name: &'static str, step: StepFn<C, E>) -> Self {
        self.steps.push((name, step));
        self
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Number of stages already completed.
    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.steps.len()
    }

    /// Fraction of stages completed, 1.0 for an empty runner.
    pub fn progress(&self) -> f32 {
        if self.steps.is_empty() {
            1.0
        } else {
            self.current as f32 / self.steps.len() as f32
        }
    }

    /// Name of the next stage to run.
    pub fn current_name(&self) -> Option<&'static str> {
        self.steps.get(self.current).map(|(name, _)| *name)
    }

    /// Run the next stage. Returns `Ok(false)` when every stage has run.
    pub fn next_step(&mut self, ctx: &mut C) -> Result<bool, E> {
        let Some(&(name, step)) = self.steps.get(self.current) else {
            return Ok(false);
        };
        debug!("step {}/{}: {}", self.current + 1, self.steps.len(), name);
        step(ctx)?;
        self.current += 1;
        Ok(true)
    }

    /// Run all remaining stages in order.
    pub fn run(&mut self, ctx: &mut C) -> Result<(), E> {
        while self.next_step(ctx)? {}
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_a(log: &mut Vec<&'static str>) -> Result<(), String> {
        log.push("a");
        Ok(())
    }

    fn push_b(log: &mut Vec<&'static str>) -> Result<(), String> {
        log.push("b");
        Ok(())
    }

    fn fail(_: &mut Vec<&'static str>) -> Result<(), String> {
        Err("boom".to_string())
    }

    #[test]
    fn test_runs_in_order_once() {
        let mut steps = Steps::new().then("a", push_a).then("b", push_b);
        let mut log = Vec::new();
        steps.run(&mut log).unwrap();
        steps.run(&mut log).unwrap();
        assert_eq!(log, vec!["a", "b"]);
        assert!(steps.is_complete());
        assert_eq!(steps.progress(), 1.0);
    }

    #[test]
    fn test_incremental_progress() {
        let mut steps = Steps::new().then("a", push_a).then("b", push_b);
        let mut log = Vec::new();
        assert_eq!(steps.current_name(), Some("a"));
        assert!(steps.next_step(&mut log).unwrap());
        assert_eq!(steps.current_step(), 1);
        assert_eq!(steps.progress(), 0.5);
        assert!(steps.next_step(&mut log).unwrap());
        assert!(!steps.next_step(&mut log).unwrap());
        assert_eq!(steps.current_name(), None);
    }

    #[test]
    fn test_error_stops_run() {
        let mut steps = Steps::new().then("a", push_a).then("fail", fail).then("b", push_b);
        let mut log = Vec::new();
        assert_eq!(steps.run(&mut log), Err("boom".to_string()));
        assert_eq!(log, vec!["a"]);
        assert_eq!(steps.current_name(), Some("fail"));
    }

    #[test]
    fn test_empty_runner_is_complete() {
        let steps: Steps<(), ()> = Steps::new();
        assert!(steps.is_complete());
        assert_eq!(steps.total_steps(), 0);
    }
}
