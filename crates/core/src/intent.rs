//! Intent classification for spoken commands.
//!
//! Classification is deliberately shallow: case-insensitive substring
//! containment against fixed keyword sets, evaluated in a fixed priority
//! order. The priority contract is encoded as an explicit ordered rule list
//! so it stays visible and independently testable.

/// The classified purpose of one utterance within the session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// The user wants the application changed; carries the full utterance.
    ModifyRequest(String),
    /// The user is satisfied with the current state of the application.
    ConfirmSatisfied,
    /// The user confirmed the deployment prompt.
    DeployYes,
    /// The user declined the deployment prompt.
    DeployNo,
    /// The user asked to end the session.
    Exit,
    /// The utterance matched no known command.
    Unrecognized,
}

/// Keywords that mark an utterance as a modification request.
const MODIFY_KEYWORDS: [&str; 5] = ["create", "add", "update", "change", "style"];

/// Classifies a development-phase utterance.
///
/// Rules are evaluated top to bottom; the first match wins. "looks good" is
/// checked before the modify keywords, so an utterance containing both is
/// treated as satisfaction, not as a change request.
pub fn classify(utterance: &str) -> Intent {
    let lowered = utterance.to_lowercase();

    type Rule = (fn(&str) -> bool, fn(&str) -> Intent);
    const RULES: [Rule; 3] = [
        (
            |text| text.contains("looks good"),
            |_| Intent::ConfirmSatisfied,
        ),
        (
            |text| MODIFY_KEYWORDS.iter().any(|kw| text.contains(kw)),
            |original| Intent::ModifyRequest(original.to_string()),
        ),
        (|text| text.contains("exit"), |_| Intent::Exit),
    ];

    for (matches, build) in RULES {
        if matches(&lowered) {
            return build(utterance);
        }
    }
    Intent::Unrecognized
}

/// Classifies the answer to the deploy-confirmation prompt.
///
/// Anything containing "yes" confirms; everything else declines and returns
/// the session to development.
pub fn classify_confirmation(utterance: &str) -> Intent {
    if utterance.to_lowercase().contains("yes") {
        Intent::DeployYes
    } else {
        Intent::DeployNo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_good_is_satisfaction() {
        assert_eq!(classify("This looks good"), Intent::ConfirmSatisfied);
        assert_eq!(classify("LOOKS GOOD to me!"), Intent::ConfirmSatisfied);
        assert_eq!(
            classify("honestly it just looks good now"),
            Intent::ConfirmSatisfied
        );
    }

    #[test]
    fn looks_good_outranks_modify_keywords() {
        // Contains both "looks good" and the modify keyword "change".
        assert_eq!(
            classify("It looks good, no need to change anything"),
            Intent::ConfirmSatisfied
        );
        assert_eq!(
            classify("add nothing else, this looks good"),
            Intent::ConfirmSatisfied
        );
    }

    #[test]
    fn modify_keywords_yield_modify_request() {
        let utterance = "Create a modern navbar with logo and search bar";
        assert_eq!(
            classify(utterance),
            Intent::ModifyRequest(utterance.to_string())
        );
        assert_eq!(
            classify("please UPDATE the footer"),
            Intent::ModifyRequest("please UPDATE the footer".to_string())
        );
        assert_eq!(
            classify("style the buttons in blue"),
            Intent::ModifyRequest("style the buttons in blue".to_string())
        );
    }

    #[test]
    fn modify_request_preserves_original_casing() {
        match classify("Add A Hero Section") {
            Intent::ModifyRequest(text) => assert_eq!(text, "Add A Hero Section"),
            other => panic!("expected ModifyRequest, got {:?}", other),
        }
    }

    #[test]
    fn exit_only_matches_when_nothing_else_does() {
        assert_eq!(classify("exit"), Intent::Exit);
        assert_eq!(classify("I want to Exit now"), Intent::Exit);
        // "change" wins over "exit" because modify keywords rank higher.
        assert_eq!(
            classify("change the exit button"),
            Intent::ModifyRequest("change the exit button".to_string())
        );
    }

    #[test]
    fn unknown_utterances_are_unrecognized() {
        assert_eq!(classify("hello there"), Intent::Unrecognized);
        assert_eq!(classify(""), Intent::Unrecognized);
    }

    #[test]
    fn confirmation_requires_yes() {
        assert_eq!(classify_confirmation("yes please deploy"), Intent::DeployYes);
        assert_eq!(classify_confirmation("YES"), Intent::DeployYes);
        assert_eq!(classify_confirmation("no, keep going"), Intent::DeployNo);
        assert_eq!(classify_confirmation("maybe later"), Intent::DeployNo);
    }
}
