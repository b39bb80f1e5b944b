//! End-to-end comparisons over whole holdings.

use ratio_core::{
    ContextRegister, Enactment, Entity, Fact, Factor, Holding, Predicate, Procedure, Rule, Term,
};

fn fact(content: &str, names: &[&str]) -> Factor {
    let predicate = Predicate::new(content).expect("valid predicate");
    let terms = names
        .iter()
        .map(|n| Term::Entity(Entity::new(*n)))
        .collect();
    Factor::Fact(Fact::new(predicate, terms).expect("valid fact"))
}

fn false_fact(content: &str, names: &[&str]) -> Factor {
    let predicate = Predicate::build(content, Some(false), None, None, false)
        .expect("valid predicate");
    let terms = names
        .iter()
        .map(|n| Term::Entity(Entity::new(*n)))
        .collect();
    Factor::Fact(Fact::new(predicate, terms).expect("valid fact"))
}

fn subsistence_clause() -> Enactment {
    Enactment::new(
        "/us/usc/t17/s102/a",
        "Copyright protection subsists, in accordance with this title, in \
         original works of authorship fixed in any tangible medium of expression",
    )
}

/// A copyright-subsistence rule: works that were not original were not
/// copyrightable.
fn unoriginal_rule() -> Rule {
    Rule::new(
        Procedure::new(
            vec![false_fact("{} was copyrightable", &["the work"])],
            vec![false_fact("{} was an original work", &["the work"])],
            Vec::<Factor>::new(),
        )
        .expect("valid procedure"),
    )
    .with_mandatory(true)
    .with_enactments(vec![subsistence_clause()])
}

#[test]
fn added_redundant_despite_factor_preserves_implication() {
    let base = Holding::new(unoriginal_rule());
    let with_despite = Holding::new(
        unoriginal_rule()
            .with_added_despite(fact("{} was a compilation of facts", &["the work"])),
    );
    // A despite factor never helps trigger the rule, so a rule without it
    // still implies the rule that merely tolerates it.
    assert!(base.implies(&with_despite));
    // The reverse holds too: tolerating one more factor asserts no less
    // about when the rule fires.
    assert!(with_despite.implies(&base));
}

#[test]
fn contradicting_despite_factor_blocks_implication() {
    let base = Holding::new(unoriginal_rule());
    // A rule claiming to fire despite the work being original conflicts
    // with the base rule's own input.
    let conflicted = Holding::new(
        unoriginal_rule().with_added_despite(fact("{} was an original work", &["the work"])),
    );
    assert!(!base.implies(&conflicted));
}

#[test]
fn lotus_and_java_holdings_contradict_with_paired_entities() {
    // One court: a method of operation is never copyrightable.
    let lotus = Holding::new(
        Rule::new(
            Procedure::new(
                vec![false_fact("{} was copyrightable", &["the Lotus menu hierarchy"])],
                vec![fact(
                    "{} was a method of operation",
                    &["the Lotus menu hierarchy"],
                )],
                Vec::<Factor>::new(),
            )
            .expect("valid procedure"),
        )
        .with_mandatory(true)
        .with_universal(true),
    );
    // Another court: this structurally analogous thing was copyrightable.
    let oracle = Holding::new(
        Rule::new(
            Procedure::new(
                vec![fact("{} was copyrightable", &["the Java API"])],
                vec![fact("{} was a method of operation", &["the Java API"])],
                Vec::<Factor>::new(),
            )
            .expect("valid procedure"),
        )
        .with_mandatory(true)
        .with_universal(true),
    );

    assert!(lotus.contradicts(&oracle));
    assert!(oracle.contradicts(&lotus));

    let explanation = lotus
        .explain_contradiction(&oracle)
        .expect("a witness explanation");
    // The witness pairs the two analogous generic entities.
    assert_eq!(
        explanation
            .context
            .get(&Term::Entity(Entity::new("the Lotus menu hierarchy"))),
        Some(&Term::Entity(Entity::new("the Java API")))
    );
    let prose = explanation.to_string();
    assert!(prose.contains("<the Lotus menu hierarchy> is like <the Java API>"));
}

#[test]
fn reflexivity() {
    let holding = Holding::new(unoriginal_rule());
    assert!(holding.implies(&holding.clone()));
    assert!(holding.means(&holding.clone()));
}

#[test]
fn mutual_implication_of_renamed_structures_is_equivalence() {
    let left = Holding::new(
        Rule::new(
            Procedure::new(
                vec![fact("{} was liable to {}", &["Alice", "Bob"])],
                vec![fact("{} was negligent toward {}", &["Alice", "Bob"])],
                Vec::<Factor>::new(),
            )
            .expect("valid procedure"),
        ),
    );
    let right = Holding::new(
        Rule::new(
            Procedure::new(
                vec![fact("{} was liable to {}", &["Craig", "Dan"])],
                vec![fact("{} was negligent toward {}", &["Craig", "Dan"])],
                Vec::<Factor>::new(),
            )
            .expect("valid procedure"),
        ),
    );
    assert!(left.implies(&right));
    assert!(right.implies(&left));
    assert!(left.means(&right));
}

#[test]
fn contradiction_is_symmetric_and_implication_is_not() {
    let strong = Holding::new(unoriginal_rule().with_universal(true));
    let weak = Holding::new(unoriginal_rule());
    assert!(strong.implies(&weak));
    assert!(!weak.implies(&strong));
    let rejected = Holding::build(unoriginal_rule().with_universal(true), false, true, false)
        .expect("valid holding");
    assert_eq!(
        strong.contradicts(&rejected),
        rejected.contradicts(&strong)
    );
    assert!(strong.contradicts(&rejected));
}

#[test]
fn exclusive_holding_contradicts_a_contrapositive_violation() {
    // "Being a method of operation is the ONLY way to be uncopyrightable."
    let exclusive = Holding::build(
        Rule::new(
            Procedure::new(
                vec![false_fact("{} was copyrightable", &["the work"])],
                vec![fact("{} was a method of operation", &["the work"])],
                Vec::<Factor>::new(),
            )
            .expect("valid procedure"),
        )
        .with_mandatory(true)
        .with_universal(true),
        true,
        true,
        true,
    )
    .expect("valid holding");

    // A holding that a work which was not a method of operation was still
    // not copyrightable violates the contrapositive.
    let violation = Holding::new(
        Rule::new(
            Procedure::new(
                vec![false_fact("{} was copyrightable", &["the program"])],
                vec![fact("{} was a method of operation", &["the program"]).with_absent(true)],
                Vec::<Factor>::new(),
            )
            .expect("valid procedure"),
        )
        .with_mandatory(true)
        .with_universal(true),
    );

    assert!(exclusive.contradicts(&violation));
    // Without the exclusive flag there is no contrapositive to offend.
    let nonexclusive = Holding::new(exclusive.rule().clone());
    assert!(!nonexclusive.contradicts(&violation));
}

#[test]
fn explanation_packages_the_related_holdings() {
    let strong = Holding::new(unoriginal_rule().with_universal(true));
    let weak = Holding::new(unoriginal_rule());
    let explanation = strong.explain_implication(&weak).expect("implication holds");
    assert_eq!(explanation.left, strong);
    assert_eq!(explanation.right, weak);
    assert!(strong.explain_implication(&Holding::new(
        Rule::new(
            Procedure::new(
                vec![fact("{} was famous", &["the work"])],
                Vec::<Factor>::new(),
                Vec::<Factor>::new(),
            )
            .expect("valid procedure"),
        )
    ))
    .is_none());
}

#[test]
fn comparisons_share_nothing_across_threads() {
    use rayon::prelude::*;

    let base = Holding::new(unoriginal_rule().with_universal(true));
    let others: Vec<Holding> = (0..16)
        .map(|i| {
            let name = format!("work number {i}");
            Holding::build(
                Rule::new(
                    Procedure::new(
                        vec![false_fact("{} was copyrightable", &[name.as_str()])],
                        vec![false_fact("{} was an original work", &[name.as_str()])],
                        Vec::<Factor>::new(),
                    )
                    .expect("valid procedure"),
                )
                .with_mandatory(true)
                .with_universal(true),
                i % 2 == 0,
                true,
                false,
            )
            .expect("valid holding")
        })
        .collect();

    let serial: Vec<bool> = others.iter().map(|h| base.contradicts(h)).collect();
    let parallel: Vec<bool> = others.par_iter().map(|h| base.contradicts(h)).collect();
    assert_eq!(serial, parallel);
    // Rejecting the rule contradicts the base holding; accepting it does not.
    assert!(parallel.iter().enumerate().all(|(i, &c)| c == (i % 2 != 0)));
}

#[test]
fn holding_addition_extends_the_chain() {
    let first = Holding::new(
        Rule::new(
            Procedure::new(
                vec![fact("{} infringed the copyright of {}", &["the defendant", "the plaintiff"])],
                vec![fact("{} copied the work of {}", &["the defendant", "the plaintiff"])],
                Vec::<Factor>::new(),
            )
            .expect("valid procedure"),
        )
        .with_universal(true),
    );
    let second = Holding::new(
        Rule::new(
            Procedure::new(
                vec![fact("{} owed damages to {}", &["the defendant", "the plaintiff"])],
                vec![fact("{} infringed the copyright of {}", &["the defendant", "the plaintiff"])],
                Vec::<Factor>::new(),
            )
            .expect("valid procedure"),
        )
        .with_universal(true),
    );
    let combined = first.add(&second).expect("inputs discharged");
    assert!(combined.rule().outputs().factors().iter().any(|f| {
        f.means(&fact(
            "{} owed damages to {}",
            &["the defendant", "the plaintiff"],
        ))
    }));
    assert!(combined
        .rule()
        .inputs()
        .means(first.rule().inputs()));

    let undecided = Holding::build(second.rule().clone(), true, false, false)
        .expect("valid holding");
    assert!(first.add(&undecided).is_none());
}

#[test]
fn seeded_context_constrains_the_search() {
    let left = Holding::new(
        Rule::new(
            Procedure::new(
                vec![fact("{} was liable to {}", &["Alice", "Bob"])],
                vec![fact("{} was negligent toward {}", &["Alice", "Bob"])],
                Vec::<Factor>::new(),
            )
            .expect("valid procedure"),
        ),
    );
    let right = Holding::new(
        Rule::new(
            Procedure::new(
                vec![fact("{} was liable to {}", &["Craig", "Dan"])],
                vec![fact("{} was negligent toward {}", &["Craig", "Dan"])],
                Vec::<Factor>::new(),
            )
            .expect("valid procedure"),
        ),
    );
    // Forcing Alice to correspond to Dan makes the pairing impossible.
    let crossed = ContextRegister::new()
        .try_extended(
            &Term::Entity(Entity::new("Alice")),
            &Term::Entity(Entity::new("Dan")),
        )
        .expect("fresh pair");
    assert!(left
        .explanations_implication(&right, &crossed)
        .next()
        .is_none());
    let aligned = ContextRegister::new()
        .try_extended(
            &Term::Entity(Entity::new("Alice")),
            &Term::Entity(Entity::new("Craig")),
        )
        .expect("fresh pair");
    assert!(left
        .explanations_implication(&right, &aligned)
        .next()
        .is_some());
}
