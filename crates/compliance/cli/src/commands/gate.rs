use compliance_consent::ConfirmationConfig;
use serde_json::json;

use super::CommandOutput;
use crate::error::CliResult;

/// Input given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateArg {
    Typed(String),
    Acknowledged,
}

/// Run one confirmation episode: open the dialog, enter the input and try to
/// confirm. Fails (exit 1) when the action may not proceed.
pub fn execute(config: &ConfirmationConfig, input: GateArg) -> CliResult<CommandOutput> {
    let mut gate = config.gate()?;
    gate.open_dialog();
    match input {
        GateArg::Typed(text) => gate.set_typed(text),
        GateArg::Acknowledged => gate.set_acknowledged(true),
    }

    Ok(match gate.confirm() {
        Ok(confirmation) => CommandOutput::ok(json!({
            "proceed": true,
            "confirmation": confirmation,
        })),
        Err(err) => CommandOutput::failed(json!({
            "proceed": false,
            "reason": err.to_string(),
        })),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use compliance_consent::ConfirmationKind;

    #[test]
    fn exact_text_is_case_sensitive() {
        let config = ConfirmationConfig::default();
        assert!(!execute(&config, GateArg::Typed("delete".into())).unwrap().success);
        assert!(execute(&config, GateArg::Typed("DELETE".into())).unwrap().success);
    }

    #[test]
    fn acknowledgement_mode() {
        let config = ConfirmationConfig {
            kind: ConfirmationKind::Acknowledgement,
            ..ConfirmationConfig::default()
        };
        assert!(execute(&config, GateArg::Acknowledged).unwrap().success);
        assert!(!execute(&config, GateArg::Typed("DELETE".into())).unwrap().success);
    }
}
