use compliance_consent::{ConsentChange, ConsentConfig};
use serde_json::json;
use tracing::warn;

use super::CommandOutput;
use crate::error::CliResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bulk {
    AcceptAll,
    RejectAll,
}

/// Build a fresh record from the configured catalog, apply the bulk action
/// then individual grants and withdrawals, and print the result.
pub fn execute(
    config: &ConsentConfig,
    bulk: Option<Bulk>,
    grants: &[String],
    withdrawals: &[String],
) -> CliResult<CommandOutput> {
    let mut record = config.record()?;

    // Resolve everything up front so a typo leaves nothing half-applied.
    for id in grants.iter().chain(withdrawals) {
        record.catalog().resolve(id)?;
    }

    match bulk {
        Some(Bulk::AcceptAll) => {
            record.accept_all();
        }
        Some(Bulk::RejectAll) => {
            record.reject_all();
        }
        None => {}
    }

    let mut changes: Vec<ConsentChange> = Vec::new();
    let updates = grants
        .iter()
        .map(|id| (id, true))
        .chain(withdrawals.iter().map(|id| (id, false)));
    for (id, granted) in updates {
        match record.set_consent(id, granted) {
            Some(change) => changes.push(change),
            None => warn!(category = %id, "Required category cannot be changed"),
        }
    }

    Ok(CommandOutput::ok(json!({
        "preferences": record.preferences(),
        "changes": changes
            .iter()
            .map(|c| json!({"category": c.category, "action": c.action}))
            .collect::<Vec<_>>(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    #[test]
    fn reject_all_then_grant() {
        let output = execute(
            &ConsentConfig::default(),
            Some(Bulk::RejectAll),
            &["analytics".to_string()],
            &[],
        )
        .unwrap();
        let body = output.body.unwrap();
        assert_eq!(body["preferences"]["necessary"], true);
        assert_eq!(body["preferences"]["analytics"], true);
        assert_eq!(body["preferences"]["marketing"], false);
        assert_eq!(body["changes"][0]["action"], "grant");
    }

    #[test]
    fn withdrawing_necessary_is_ignored() {
        let output = execute(
            &ConsentConfig::default(),
            Some(Bulk::AcceptAll),
            &[],
            &["necessary".to_string()],
        )
        .unwrap();
        let body = output.body.unwrap();
        assert_eq!(body["preferences"]["necessary"], true);
        assert_eq!(body["changes"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn unknown_category_fails() {
        let err = execute(&ConsentConfig::default(), None, &["ads".to_string()], &[]).unwrap_err();
        assert!(matches!(err, CliError::Consent(_)));
    }
}
