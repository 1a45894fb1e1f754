// Copyright (C) 2026 The Mela Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use mela_domain::FieldValue;
use thiserror::Error;

/// One positional SQL parameter of a mutation step.
///
/// `GeneratedId(i)` resolves at execution time to the row id generated
/// by step `i`, which must precede the referencing step. This replaces
/// the original design's function-valued parameters: the dependency is
/// plain data, checkable before anything touches the database.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// A literal value.
    Value(FieldValue),
    /// The insert-identity of an earlier step, by plan index.
    GeneratedId(usize),
}

/// One SQL statement plus its parameter sources.
///
/// Steps are immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationStep {
    /// The statement, with `?N` positional placeholders.
    pub sql: String,
    /// Parameters, in placeholder order.
    pub params: Vec<Param>,
    /// Whether this step returns rows that become the operation's
    /// response entity (a read-back step).
    pub fetch: bool,
}

impl MutationStep {
    /// Creates a write step.
    #[must_use]
    pub const fn new(sql: String, params: Vec<Param>) -> Self {
        Self {
            sql,
            params,
            fetch: false,
        }
    }

    /// Creates a read-back step whose rows are collected.
    #[must_use]
    pub const fn fetch(sql: String, params: Vec<Param>) -> Self {
        Self {
            sql,
            params,
            fetch: true,
        }
    }
}

/// A structurally invalid mutation plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// A mutation must always carry at least the domain statement.
    #[error("a mutation plan must contain at least one step")]
    Empty,
    /// A step references a generated id that is not produced strictly
    /// before it.
    #[error("step {step} references the generated id of step {referenced}, which does not precede it")]
    ForwardReference {
        /// The referencing step index.
        step: usize,
        /// The referenced step index.
        referenced: usize,
    },
}

/// An ordered sequence of mutation steps executed atomically.
///
/// Invariants: the plan is non-empty, any step depending on another
/// step's generated identity appears strictly after it, and the final
/// step of a mutating plan is the audit step (except the self-edit
/// carve-out, where the caller deliberately appends none).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MutationPlan {
    steps: Vec<MutationStep>,
}

impl MutationPlan {
    /// Creates an empty plan. Builders push steps into it; an empty
    /// plan is rejected at execution time.
    #[must_use]
    pub const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Appends a step.
    pub fn push(&mut self, step: MutationStep) {
        self.steps.push(step);
    }

    /// Returns the steps in execution order.
    #[must_use]
    pub fn steps(&self) -> &[MutationStep] {
        &self.steps
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the plan has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Checks the structural invariants: non-empty, and every
    /// `GeneratedId` reference points strictly backwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan is empty or a step references a
    /// step that does not precede it.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.steps.is_empty() {
            return Err(PlanError::Empty);
        }
        for (index, step) in self.steps.iter().enumerate() {
            for param in &step.params {
                if let Param::GeneratedId(referenced) = param
                    && *referenced >= index
                {
                    return Err(PlanError::ForwardReference {
                        step: index,
                        referenced: *referenced,
                    });
                }
            }
        }
        Ok(())
    }
}
