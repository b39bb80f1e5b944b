use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::ProcedureError;
use crate::factors::{Factor, FactorGroup};
use crate::matching::{group_witnesses, ContextRegister, Operation, WitnessIter};
use crate::terms::Term;

/// A conditional rule body: a court that finds the `inputs` may reach the
/// `outputs`, and the `despite` factors do not block it.
///
/// Immutable once constructed. Comparison variants differ by how widely
/// each side is asserted to apply; the `universal` flag that picks between
/// them lives on [`crate::rules::Rule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Procedure {
    outputs: FactorGroup,
    inputs: FactorGroup,
    despite: FactorGroup,
}

impl Procedure {
    /// Build a procedure, rejecting a factor that appears as both an
    /// output and a despite factor.
    pub fn new(
        outputs: impl Into<FactorGroup>,
        inputs: impl Into<FactorGroup>,
        despite: impl Into<FactorGroup>,
    ) -> Result<Self, ProcedureError> {
        let outputs = outputs.into();
        let inputs = inputs.into();
        let despite = despite.into();
        for output in &outputs {
            if despite.iter().any(|d| output.means(d)) {
                return Err(ProcedureError::OutputAlsoDespite {
                    factor: output.to_string(),
                });
            }
        }
        Ok(Self {
            outputs,
            inputs,
            despite,
        })
    }

    /// Internal rebuild for semantic transformations (context replacement,
    /// contrapositives) that cannot introduce user-input errors.
    pub(crate) fn from_parts(
        outputs: FactorGroup,
        inputs: FactorGroup,
        despite: FactorGroup,
    ) -> Self {
        Self {
            outputs,
            inputs,
            despite,
        }
    }

    pub fn outputs(&self) -> &FactorGroup {
        &self.outputs
    }

    pub fn inputs(&self) -> &FactorGroup {
        &self.inputs
    }

    pub fn despite(&self) -> &FactorGroup {
        &self.despite
    }

    /// Every factor in the procedure, outputs first.
    pub fn factors_all(&self) -> impl Iterator<Item = &Factor> {
        self.outputs
            .iter()
            .chain(self.inputs.iter())
            .chain(self.despite.iter())
    }

    pub fn generic_terms(&self) -> Vec<Term> {
        let mut out: Vec<Term> = Vec::new();
        for factor in self.factors_all() {
            for generic in factor.generic_terms() {
                if !out.contains(&generic) {
                    out.push(generic);
                }
            }
        }
        out
    }

    pub fn new_context(&self, register: &ContextRegister) -> Procedure {
        let map = |group: &FactorGroup| {
            FactorGroup::new(group.iter().map(|f| f.new_context(register)).collect())
        };
        Procedure::from_parts(map(&self.outputs), map(&self.inputs), map(&self.despite))
    }

    fn despite_or_inputs(&self) -> Arc<Vec<Factor>> {
        Arc::new([self.despite.to_vec(), self.inputs.to_vec()].concat())
    }

    /// Registers under which "self applies in some cases" implies "other
    /// applies in some cases": other's outputs from self's outputs, other's
    /// inputs from self's inputs, and every despite factor of other either
    /// discharged by self's despite-or-inputs or merely tolerated, all
    /// jointly.
    ///
    /// A despite factor never helps trigger a rule, so one that self's own
    /// factors neither supply nor contradict weakens the implied rule
    /// rather than strengthening it; it must not block the implication.
    pub fn explanations_implication(
        &self,
        other: &Procedure,
        context: &ContextRegister,
    ) -> WitnessIter {
        let witnesses = group_witnesses(
            self.outputs.shared(),
            other.outputs.to_vec(),
            Operation::Implies,
            context.clone(),
        );
        let self_inputs = self.inputs.shared();
        let other_inputs = other.inputs.to_vec();
        let witnesses = witnesses.flat_map(move |register| {
            group_witnesses(
                Arc::clone(&self_inputs),
                other_inputs.clone(),
                Operation::Implies,
                register,
            )
        });
        let pool = self.despite_or_inputs();
        let inputs_group = self.inputs.clone();
        let other_despite = other.despite.to_vec();
        Box::new(witnesses.flat_map(move |register| {
            despite_witnesses(
                Arc::clone(&pool),
                inputs_group.clone(),
                other_despite.clone(),
                register,
            )
        }))
    }

    pub fn implies(&self, other: &Procedure) -> bool {
        self.explanations_implication(other, &ContextRegister::new())
            .next()
            .is_some()
    }

    /// Registers under which "self applies in all cases" implies "other
    /// applies in all cases": other's outputs from self's outputs, then
    /// every input of self implied by some input of other, with self's
    /// inputs consistent with other's despite factors.
    pub fn explanations_implication_all_to_all(
        &self,
        other: &Procedure,
        context: &ContextRegister,
    ) -> WitnessIter {
        let witnesses = group_witnesses(
            self.outputs.shared(),
            other.outputs.to_vec(),
            Operation::Implies,
            context.clone(),
        );
        let other_inputs = other.inputs.shared();
        let self_inputs = self.inputs.to_vec();
        let witnesses = witnesses.flat_map(move |register| {
            group_witnesses(
                Arc::clone(&other_inputs),
                self_inputs.clone(),
                Operation::Implies,
                register.reversed(),
            )
            .map(|r| r.reversed())
        });
        let self_inputs_group = self.inputs.clone();
        let other_despite_group = other.despite.clone();
        Box::new(witnesses.filter(move |register| {
            self_inputs_group.consistent_with(&other_despite_group, register)
        }))
    }

    pub fn implies_all_to_all(&self, other: &Procedure) -> bool {
        self.explanations_implication_all_to_all(other, &ContextRegister::new())
            .next()
            .is_some()
    }

    /// Registers under which "self applies in all cases" implies "other
    /// applies in some cases". The all-to-all witnesses qualify; beyond
    /// them, other's outputs must follow from self's outputs and other's
    /// despite factors from self's despite-or-inputs, with self's inputs
    /// consistent with everything other tolerates.
    pub fn explanations_implication_all_to_some(
        &self,
        other: &Procedure,
        context: &ContextRegister,
    ) -> WitnessIter {
        let first = self.explanations_implication_all_to_all(other, context);
        let witnesses = group_witnesses(
            self.outputs.shared(),
            other.outputs.to_vec(),
            Operation::Implies,
            context.clone(),
        );
        let pool = self.despite_or_inputs();
        let other_despite = other.despite.to_vec();
        let witnesses = witnesses.flat_map(move |register| {
            group_witnesses(
                Arc::clone(&pool),
                other_despite.clone(),
                Operation::Implies,
                register,
            )
        });
        let self_inputs_group = self.inputs.clone();
        let other_pool_group =
            FactorGroup::new([other.despite.to_vec(), other.inputs.to_vec()].concat());
        let second = witnesses
            .filter(move |register| self_inputs_group.consistent_with(&other_pool_group, register));
        Box::new(first.chain(second))
    }

    pub fn implies_all_to_some(&self, other: &Procedure) -> bool {
        self.explanations_implication_all_to_some(other, &ContextRegister::new())
            .next()
            .is_some()
    }

    /// Registers under which "self applies in some cases" contradicts
    /// "other applies in all cases": a context satisfying both sides'
    /// conditions (every input of other implied by self's despite-or-inputs)
    /// in which a pair of outputs contradicts.
    pub fn explanations_contradiction_some_to_all(
        &self,
        other: &Procedure,
        context: &ContextRegister,
    ) -> WitnessIter {
        let witnesses = group_witnesses(
            self.despite_or_inputs(),
            other.inputs.to_vec(),
            Operation::Implies,
            context.clone(),
        );
        let self_outputs = self.outputs.to_vec();
        let other_outputs = other.outputs.to_vec();
        Box::new(witnesses.flat_map(move |register| {
            let mut found = Vec::new();
            for mine in &self_outputs {
                for theirs in &other_outputs {
                    found.extend(mine.explanations_contradiction(theirs, &register));
                }
            }
            found.into_iter()
        }))
    }

    pub fn contradicts_some_to_all(&self, other: &Procedure) -> bool {
        self.explanations_contradiction_some_to_all(other, &ContextRegister::new())
            .next()
            .is_some()
    }

    /// Registers under which the procedures have the same factors in the
    /// same roles, up to generic renaming.
    pub fn explanations_same_meaning(
        &self,
        other: &Procedure,
        context: &ContextRegister,
    ) -> WitnessIter {
        let witnesses = group_witnesses(
            self.outputs.shared(),
            other.outputs.to_vec(),
            Operation::SameMeaning,
            context.clone(),
        );
        let self_inputs = self.inputs.shared();
        let other_inputs = other.inputs.to_vec();
        let witnesses = witnesses.flat_map(move |register| {
            group_witnesses(
                Arc::clone(&self_inputs),
                other_inputs.clone(),
                Operation::SameMeaning,
                register,
            )
        });
        let self_despite = self.despite.shared();
        let other_despite = other.despite.to_vec();
        let witnesses = witnesses.flat_map(move |register| {
            group_witnesses(
                Arc::clone(&self_despite),
                other_despite.clone(),
                Operation::SameMeaning,
                register,
            )
        });
        let reverse_pairs = vec![
            (other.outputs.clone(), self.outputs.to_vec()),
            (other.inputs.clone(), self.inputs.to_vec()),
            (other.despite.clone(), self.despite.to_vec()),
        ];
        Box::new(witnesses.filter(move |register| {
            reverse_pairs.iter().all(|(available, need)| {
                group_witnesses(
                    available.shared(),
                    need.clone(),
                    Operation::SameMeaning,
                    register.reversed(),
                )
                .next()
                .is_some()
            })
        }))
    }

    pub fn means(&self, other: &Procedure) -> bool {
        self.explanations_same_meaning(other, &ContextRegister::new())
            .next()
            .is_some()
    }

    /// Combine two procedures: valid only if every input of `other` is
    /// implied by some output or despite factor of `self` under one
    /// consistent mapping. Inputs of `other` discharged by `self`'s outputs
    /// disappear; the rest join `self`'s inputs. Outputs union; despite
    /// factors union, deduplicated by implication.
    pub fn add(&self, other: &Procedure) -> Option<Procedure> {
        let pool = Arc::new([self.outputs.to_vec(), self.despite.to_vec()].concat());
        let witness = group_witnesses(
            pool,
            other.inputs.to_vec(),
            Operation::Implies,
            ContextRegister::new(),
        )
        .next()?;
        let rewritten = other.new_context(&witness.reversed());

        let mut inputs = self.inputs.to_vec();
        for incoming in rewritten.inputs.iter() {
            let discharged = self.outputs.iter().any(|output| output.implies(incoming));
            if !discharged && !inputs.iter().any(|kept| kept.means(incoming)) {
                inputs.push(incoming.clone());
            }
        }

        let mut outputs = self.outputs.to_vec();
        for incoming in rewritten.outputs.iter() {
            if !outputs.iter().any(|kept| kept.means(incoming)) {
                outputs.push(incoming.clone());
            }
        }

        let combined_despite = [self.despite.to_vec(), rewritten.despite.to_vec()].concat();
        let mut despite: Vec<Factor> = Vec::new();
        for incoming in combined_despite {
            if despite.iter().any(|kept| kept.implies(&incoming)) {
                continue;
            }
            despite.retain(|kept| !incoming.implies(kept));
            despite.push(incoming);
        }

        Procedure::new(outputs, inputs, despite).ok()
    }
}

/// Satisfy one despite factor of the implied procedure at a time: either
/// some member of `pool` implies it (extending the register), or it is
/// consistent with the implying procedure's inputs and passes untouched.
fn despite_witnesses(
    pool: Arc<Vec<Factor>>,
    inputs: FactorGroup,
    mut need: Vec<Factor>,
    seed: ContextRegister,
) -> WitnessIter {
    use crate::matching::single;

    let Some(target) = need.pop() else {
        return single(seed);
    };
    let discharged = group_witnesses(
        Arc::clone(&pool),
        vec![target.clone()],
        Operation::Implies,
        seed.clone(),
    );
    let tolerated: WitnessIter =
        if inputs.consistent_with(&FactorGroup::from(target), &seed) {
            single(seed)
        } else {
            Box::new(std::iter::empty())
        };
    Box::new(discharged.chain(tolerated).flat_map(move |register| {
        despite_witnesses(
            Arc::clone(&pool),
            inputs.clone(),
            need.clone(),
            register,
        )
    }))
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RESULT {}", self.outputs)?;
        if !self.inputs.is_empty() {
            write!(f, " GIVEN {}", self.inputs)?;
        }
        if !self.despite.is_empty() {
            write!(f, " DESPITE {}", self.despite)?;
        }
        Ok(())
    }
}
