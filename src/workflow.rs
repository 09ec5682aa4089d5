//! Workflow sequencing across dependent steps.
//!
//! A workflow is an ordered list of steps where step N+1's preflight
//! conditions depend on step N's confirmed on-ledger effect. The sequencer
//! halts at the first non-Accepted result and reports which step failed and
//! which prior steps already committed. Ledger operations are not
//! reversible, so there is no rollback — partial-failure state is explicit
//! and visible.

use std::fmt;

use async_trait::async_trait;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::BootstrapError;
use crate::horizon::SubmissionResult;

/// State machine per workflow instance:
/// `NotStarted → StepRunning(i) → {StepRunning(i+1) | Failed(i, reason) | Completed}`.
///
/// Step indices are zero-based; Display renders one-based ordinals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    NotStarted,
    StepRunning(usize),
    Failed { step: usize, reason: String },
    Completed,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowState::NotStarted => f.write_str("not started"),
            WorkflowState::StepRunning(i) => write!(f, "running step {}", i + 1),
            WorkflowState::Failed { step, reason } => {
                write!(f, "failed at step {}: {}", step + 1, reason)
            }
            WorkflowState::Completed => f.write_str("completed"),
        }
    }
}

/// The outcome of one executed submission, retained even when a later step
/// fails.
#[derive(Debug, Clone)]
pub struct StepReport {
    pub name: String,
    pub result: SubmissionResult,
}

/// One dependent step of a workflow. Implementations run the full
/// per-step pipeline: preflight, fee estimation, sequence reservation,
/// build, sign, submit.
#[async_trait]
pub trait WorkflowStep: Send {
    fn name(&self) -> &str;

    async fn run(&mut self) -> Result<SubmissionResult, BootstrapError>;
}

/// Drives a workflow's steps in order with explicit partial-failure
/// reporting.
pub struct Sequencer {
    name: String,
    run_id: Uuid,
    state: WorkflowState,
    reports: Vec<StepReport>,
}

impl Sequencer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            run_id: Uuid::new_v4(),
            state: WorkflowState::NotStarted,
            reports: Vec::new(),
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Reports for every step that reached submission, in order. After a
    /// failure at step N, the results of steps 0..N stay retrievable here.
    pub fn reports(&self) -> &[StepReport] {
        &self.reports
    }

    pub fn step_report(&self, index: usize) -> Option<&StepReport> {
        self.reports.get(index)
    }

    /// Execute the steps in order, halting at the first non-Accepted
    /// result or error.
    pub async fn run(&mut self, mut steps: Vec<Box<dyn WorkflowStep>>) -> &WorkflowState {
        for (index, step) in steps.iter_mut().enumerate() {
            self.state = WorkflowState::StepRunning(index);
            info!(
                workflow = %self.name,
                run_id = %self.run_id,
                step = index + 1,
                name = step.name(),
                "step starting"
            );

            match step.run().await {
                Ok(result) => {
                    let accepted = result.is_accepted();
                    let description = result.describe();
                    self.reports.push(StepReport {
                        name: step.name().to_string(),
                        result,
                    });

                    if accepted {
                        info!(
                            workflow = %self.name,
                            run_id = %self.run_id,
                            step = index + 1,
                            outcome = %description,
                            "step committed"
                        );
                    } else {
                        self.fail(index, description);
                        return &self.state;
                    }
                }
                Err(e) => {
                    error!(
                        workflow = %self.name,
                        run_id = %self.run_id,
                        step = index + 1,
                        category = e.category(),
                        error = %e,
                        "step aborted before a ledger verdict"
                    );
                    self.fail(index, e.to_string());
                    return &self.state;
                }
            }
        }

        self.state = WorkflowState::Completed;
        info!(workflow = %self.name, run_id = %self.run_id, "workflow completed");
        &self.state
    }

    fn fail(&mut self, step: usize, reason: String) {
        error!(
            workflow = %self.name,
            run_id = %self.run_id,
            step = step + 1,
            reason = %reason,
            committed_steps = self
                .reports
                .iter()
                .filter(|r| r.result.is_accepted())
                .count(),
            "workflow halted — earlier accepted steps are NOT rolled back"
        );
        self.state = WorkflowState::Failed { step, reason };
    }
}
