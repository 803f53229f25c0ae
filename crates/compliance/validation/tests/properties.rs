//! Property tests for the rule set: email acceptance, strength score bounds
//! and monotonicity, and rule determinism.

use compliance_validation::*;
use proptest::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Contact {
    Email,
}

impl FormField for Contact {
    const ALL: &'static [Self] = &[Contact::Email];

    fn name(&self) -> &'static str {
        "email"
    }
}

fn contact_schema() -> FormSchema<Contact> {
    FormSchema::builder()
        .field(Contact::Email, Rule::email())
        .build()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Addresses of the shape `local@domain.tld` with no whitespace.
fn arb_address() -> impl Strategy<Value = String> {
    (
        "[a-zA-Z0-9._%+-]{1,12}",
        "[a-zA-Z0-9-]{1,12}",
        prop::collection::vec("[a-zA-Z0-9-]{1,8}", 0..3),
        "[a-zA-Z]{1,6}",
    )
        .prop_map(|(local, domain, subdomains, tld)| {
            let mut host = domain;
            for sub in subdomains {
                host.push('.');
                host.push_str(&sub);
            }
            format!("{local}@{host}.{tld}")
        })
}

/// Strings containing no `@` at all.
fn arb_without_at() -> impl Strategy<Value = String> {
    "[^@]{0,30}"
}

fn arb_password_char() -> impl Strategy<Value = char> {
    prop_oneof![
        prop::char::range('a', 'z'),
        prop::char::range('A', 'Z'),
        prop::char::range('0', '9'),
        prop::sample::select(vec!['!', '@', '#', '$', '%', '^', '&', '*', '-', ' ', '~']),
    ]
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Well-formed addresses always validate to the empty message.
    #[test]
    fn well_formed_addresses_pass(address in arb_address()) {
        let schema = contact_schema();
        let values = FormValues::new();
        prop_assert_eq!(
            validate_field(&schema, Contact::Email, &FieldValue::from(address.as_str()), &values),
            ""
        );
    }

    /// Anything lacking `@` is rejected.
    #[test]
    fn strings_without_at_fail(candidate in arb_without_at()) {
        let schema = contact_schema();
        let values = FormValues::new();
        let message = validate_field(
            &schema,
            Contact::Email,
            &FieldValue::from(candidate.as_str()),
            &values,
        );
        prop_assert!(!message.is_empty());
    }

    /// Score stays within 0..=5.
    #[test]
    fn strength_score_is_bounded(password in prop::collection::vec(arb_password_char(), 0..24)) {
        let password: String = password.into_iter().collect();
        let strength = password_strength(&password, &PasswordPolicy::default());
        prop_assert!(strength.score <= 5);
        prop_assert_eq!(strength.label.is_none(), strength.score == 0);
    }

    /// Appending a character never lowers the score.
    #[test]
    fn strength_score_is_monotonic(
        prefix in prop::collection::vec(arb_password_char(), 0..16),
        extra in arb_password_char(),
    ) {
        let policy = PasswordPolicy::default();
        let before: String = prefix.iter().collect();
        let mut after = before.clone();
        after.push(extra);

        let before_score = password_strength(&before, &policy).score;
        let after_score = password_strength(&after, &policy).score;
        prop_assert!(after_score >= before_score);
        prop_assert!(after_score <= before_score + 2);
    }

    /// Passing the rule implies the maximum score.
    #[test]
    fn passing_password_scores_five(password in prop::collection::vec(arb_password_char(), 0..24)) {
        let password: String = password.into_iter().collect();
        let policy = PasswordPolicy::default();
        if policy.check(&password).is_none() {
            prop_assert_eq!(password_strength(&password, &policy).score, 5);
        }
    }

    /// Evaluating the same input twice gives the same answer.
    #[test]
    fn validation_is_deterministic(candidate in ".{0,40}") {
        let schema = contact_schema();
        let values = FormValues::new().with(Contact::Email, candidate.as_str());
        prop_assert_eq!(schema.validate_all(&values), schema.validate_all(&values));
    }
}
