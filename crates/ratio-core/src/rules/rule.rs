use std::fmt;
use std::iter;

use serde::{Deserialize, Serialize};

use crate::enactments::{consolidate_enactments, Enactment};
use crate::factors::{FactorGroup, Factor};
use crate::matching::{reversed_iter, ContextRegister, WitnessIter};
use crate::procedures::Procedure;
use crate::terms::Term;

/// A statement of legal doctrine: a procedure, the enactments cited for
/// and around it, and how widely and firmly it binds.
///
/// `mandatory` means the court has no discretion once the inputs hold;
/// `universal` means the rule applies in every case where they hold.
/// Rules are immutable; combination always produces a new rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    procedure: Procedure,
    enactments: Vec<Enactment>,
    enactments_despite: Vec<Enactment>,
    mandatory: bool,
    universal: bool,
    generic: bool,
    name: Option<String>,
}

impl Rule {
    /// A discretionary, case-specific rule with no cited enactments.
    pub fn new(procedure: Procedure) -> Self {
        Self {
            procedure,
            enactments: Vec::new(),
            enactments_despite: Vec::new(),
            mandatory: false,
            universal: false,
            generic: false,
            name: None,
        }
    }

    pub fn with_enactments(mut self, enactments: Vec<Enactment>) -> Self {
        self.enactments = enactments;
        self
    }

    pub fn with_enactments_despite(mut self, enactments: Vec<Enactment>) -> Self {
        self.enactments_despite = enactments;
        self
    }

    pub fn with_mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    pub fn with_universal(mut self, universal: bool) -> Self {
        self.universal = universal;
        self
    }

    pub fn with_generic(mut self, generic: bool) -> Self {
        self.generic = generic;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn procedure(&self) -> &Procedure {
        &self.procedure
    }

    pub fn enactments(&self) -> &[Enactment] {
        &self.enactments
    }

    pub fn enactments_despite(&self) -> &[Enactment] {
        &self.enactments_despite
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn is_universal(&self) -> bool {
        self.universal
    }

    pub fn is_generic(&self) -> bool {
        self.generic
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn outputs(&self) -> &FactorGroup {
        self.procedure.outputs()
    }

    pub fn inputs(&self) -> &FactorGroup {
        self.procedure.inputs()
    }

    pub fn despite(&self) -> &FactorGroup {
        self.procedure.despite()
    }

    pub fn generic_terms(&self) -> Vec<Term> {
        self.procedure.generic_terms()
    }

    pub fn new_context(&self, register: &ContextRegister) -> Rule {
        let mut mapped = self.clone();
        mapped.procedure = self.procedure.new_context(register);
        mapped
    }

    /// A rule relying on fewer enactments makes the stronger statement, so
    /// for `self` to imply `other`, every enactment `self` needs must be
    /// contained in one of `other`'s, and everything `other` tolerates must
    /// be contained in what `self` cites or tolerates.
    pub fn needs_subset_of_enactments(&self, other: &Rule) -> bool {
        let cited_ok = self
            .enactments
            .iter()
            .all(|e| other.enactments.iter().any(|theirs| theirs.implies(e)));
        let despite_ok = other.enactments_despite.iter().all(|theirs| {
            self.enactments
                .iter()
                .chain(self.enactments_despite.iter())
                .any(|mine| mine.implies(theirs))
        });
        cited_ok && despite_ok
    }

    fn modality_at_least(&self, other: &Rule) -> bool {
        (self.mandatory || !other.mandatory) && (self.universal || !other.universal)
    }

    /// Witnesses that `self` implies `other`, assuming both are posited as
    /// valid and decided. The universal flags pick the procedure test: a
    /// strictly more universal rule needs only all-to-some; matching
    /// universal rules need all-to-all; case-specific pairs compare
    /// some-to-some.
    pub fn explanations_implication(
        &self,
        other: &Rule,
        context: &ContextRegister,
    ) -> WitnessIter {
        if !self.needs_subset_of_enactments(other) || !self.modality_at_least(other) {
            return Box::new(iter::empty());
        }
        if self.universal && !other.universal {
            self.procedure
                .explanations_implication_all_to_some(&other.procedure, context)
        } else if other.universal {
            self.procedure
                .explanations_implication_all_to_all(&other.procedure, context)
        } else {
            self.procedure
                .explanations_implication(&other.procedure, context)
        }
    }

    pub fn implies(&self, other: &Rule) -> bool {
        self.explanations_implication(other, &ContextRegister::new())
            .next()
            .is_some()
    }

    /// Witnesses that the two rules cannot both be law. Two case-specific
    /// rules never conflict; when one side is universal, a context
    /// triggering both with contradictory outputs is a conflict in
    /// whichever direction the universal flag allows.
    pub fn explanations_contradiction(
        &self,
        other: &Rule,
        context: &ContextRegister,
    ) -> WitnessIter {
        if !self.universal && !other.universal {
            return Box::new(iter::empty());
        }
        let mut parts: Vec<WitnessIter> = Vec::new();
        if other.universal {
            parts.push(
                self.procedure
                    .explanations_contradiction_some_to_all(&other.procedure, context),
            );
        }
        if self.universal {
            parts.push(reversed_iter(
                other
                    .procedure
                    .explanations_contradiction_some_to_all(&self.procedure, &context.reversed()),
            ));
        }
        Box::new(parts.into_iter().flatten())
    }

    /// Whether the rules conflict when both are posited by valid, decided
    /// holdings. Requires a mandatory rule on some side: two discretionary
    /// rules can coexist however their outputs relate.
    pub fn contradicts(&self, other: &Rule) -> bool {
        if !self.mandatory && !other.mandatory {
            return false;
        }
        if !self.universal && !other.universal {
            return false;
        }
        self.explanations_contradiction(other, &ContextRegister::new())
            .next()
            .is_some()
    }

    fn enactment_sets_match(&self, other: &Rule) -> bool {
        let covers = |mine: &[Enactment], theirs: &[Enactment]| {
            theirs
                .iter()
                .all(|t| mine.iter().any(|m| m.means(t)))
        };
        covers(&self.enactments, &other.enactments)
            && covers(&other.enactments, &self.enactments)
            && covers(&self.enactments_despite, &other.enactments_despite)
            && covers(&other.enactments_despite, &self.enactments_despite)
    }

    pub fn explanations_same_meaning(
        &self,
        other: &Rule,
        context: &ContextRegister,
    ) -> WitnessIter {
        if self.mandatory != other.mandatory
            || self.universal != other.universal
            || !self.enactment_sets_match(other)
        {
            return Box::new(iter::empty());
        }
        self.procedure
            .explanations_same_meaning(&other.procedure, context)
    }

    pub fn means(&self, other: &Rule) -> bool {
        self.explanations_same_meaning(other, &ContextRegister::new())
            .next()
            .is_some()
    }

    /// Extend this rule with another whose inputs it discharges. Needs a
    /// universal rule somewhere (otherwise nothing guarantees the second
    /// rule fires) and enactment support no broader than this rule's.
    /// The combined rule is mandatory or universal only if both operands
    /// were.
    pub fn add(&self, other: &Rule) -> Option<Rule> {
        if !self.universal && !other.universal {
            return None;
        }
        if !other.needs_subset_of_enactments(self) {
            return None;
        }
        let procedure = self.procedure.add(&other.procedure)?;
        Some(Rule {
            procedure,
            enactments: consolidate_enactments(
                [self.enactments.clone(), other.enactments.clone()].concat(),
            ),
            enactments_despite: consolidate_enactments(
                [
                    self.enactments_despite.clone(),
                    other.enactments_despite.clone(),
                ]
                .concat(),
            ),
            mandatory: self.mandatory && other.mandatory,
            universal: self.universal && other.universal,
            generic: false,
            name: None,
        })
    }

    /// Add a factor to the rule's inputs, leaving everything else alone.
    pub fn with_added_input(&self, incoming: Factor) -> Rule {
        let mut mapped = self.clone();
        let inputs = FactorGroup::new(
            [self.inputs().to_vec(), vec![incoming]].concat(),
        );
        mapped.procedure = Procedure::from_parts(
            self.outputs().clone(),
            inputs,
            self.despite().clone(),
        );
        mapped
    }

    /// Add a despite factor, leaving everything else alone.
    pub fn with_added_despite(&self, incoming: Factor) -> Rule {
        let mut mapped = self.clone();
        let despite = FactorGroup::new(
            [self.despite().to_vec(), vec![incoming]].concat(),
        );
        mapped.procedure = Procedure::from_parts(
            self.outputs().clone(),
            self.inputs().clone(),
            despite,
        );
        mapped
    }

    /// Add a supporting enactment, consolidating overlaps.
    pub fn with_added_enactment(&self, incoming: Enactment) -> Rule {
        let mut mapped = self.clone();
        mapped.enactments =
            consolidate_enactments([self.enactments.clone(), vec![incoming]].concat());
        mapped
    }

    /// The contrapositive rules inferred when this rule is the exclusive
    /// way to reach its single output: without any one input, the output
    /// must be absent. Callers validate the exclusivity preconditions.
    pub(crate) fn contrapositives(&self) -> Vec<Rule> {
        let Some(output) = self.outputs().factors().first() else {
            return Vec::new();
        };
        let absent_output = FactorGroup::new(vec![output.clone().with_absent(true)]);
        self.inputs()
            .iter()
            .map(|input| {
                let flipped_input = input.clone().with_absent(!input.is_absent());
                let mut mapped = self.clone();
                mapped.procedure = Procedure::from_parts(
                    absent_output.clone(),
                    FactorGroup::new(vec![flipped_input]),
                    self.despite().clone(),
                );
                mapped.mandatory = !self.mandatory;
                mapped.universal = !self.universal;
                mapped
            })
            .collect()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "the rule that the court {} {} accept {}",
            if self.mandatory { "MUST" } else { "MAY" },
            if self.universal { "ALWAYS" } else { "SOMETIMES" },
            self.procedure,
        )?;
        if !self.enactments.is_empty() {
            let cited: Vec<String> = self.enactments.iter().map(|e| e.to_string()).collect();
            write!(f, " according to {}", cited.join("; "))?;
        }
        if !self.enactments_despite.is_empty() {
            let cited: Vec<String> = self
                .enactments_despite
                .iter()
                .map(|e| e.to_string())
                .collect();
            write!(f, " despite {}", cited.join("; "))?;
        }
        Ok(())
    }
}
