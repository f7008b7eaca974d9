//! Command orchestration helpers from typed input to the backend command queue.

use std::str::FromStr;

use crossbeam_channel::{Sender, TrySendError};
use shared::domain::{ActiveView, LocationId};

use crate::backend_bridge::commands::BackendCommand;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Command(BackendCommand),
    Help,
    Quit,
    Invalid(String),
    Ignore,
}

/// Maps one line of `watch` input to an action.
///
/// `:N` picks the N-th preset (1-based), `view NAME` or a bare view name
/// switches view, `city NAME` searches even when the name collides with a
/// keyword. Any other non-blank text is searched as a location.
pub fn parse_input(line: &str, presets: &[LocationId]) -> InputAction {
    let input = line.trim();
    if input.is_empty() {
        return InputAction::Ignore;
    }

    let lower = input.to_ascii_lowercase();
    match lower.as_str() {
        "quit" | "exit" | ":q" => return InputAction::Quit,
        "help" | "?" => return InputAction::Help,
        "refresh" | "r" => return InputAction::Command(BackendCommand::Refresh),
        _ => {}
    }

    if let Some(rest) = input.strip_prefix(':') {
        return match rest.trim().parse::<usize>() {
            Ok(n) if n >= 1 && n <= presets.len() => {
                InputAction::Command(BackendCommand::SelectLocation {
                    raw: presets[n - 1].as_str().to_string(),
                })
            }
            _ => InputAction::Invalid(format!(
                "no preset '{}'; choose :1 to :{}",
                rest.trim(),
                presets.len()
            )),
        };
    }

    if let Some((keyword, rest)) = input.split_once(char::is_whitespace) {
        let rest = rest.trim();
        match keyword.to_ascii_lowercase().as_str() {
            "view" => {
                return match ActiveView::from_str(rest) {
                    Ok(view) => InputAction::Command(BackendCommand::SelectView { view }),
                    Err(err) => InputAction::Invalid(err.to_string()),
                }
            }
            "city" => {
                return InputAction::Command(BackendCommand::SelectLocation {
                    raw: rest.to_string(),
                })
            }
            _ => {}
        }
    }

    if let Ok(view) = ActiveView::from_str(input) {
        return InputAction::Command(BackendCommand::SelectView { view });
    }

    InputAction::Command(BackendCommand::SelectLocation {
        raw: input.to_string(),
    })
}

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued input->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "Command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend worker disconnected (possible startup/runtime failure); restart the dashboard"
                    .to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;

    fn presets() -> Vec<LocationId> {
        ["Lahore", "Karachi", "New York"]
            .iter()
            .map(|raw| LocationId::parse(raw).expect("preset"))
            .collect()
    }

    #[test]
    fn blank_input_is_ignored() {
        assert_eq!(parse_input("   ", &presets()), InputAction::Ignore);
    }

    #[test]
    fn free_text_searches_trimmed_location() {
        assert_eq!(
            parse_input("  Paris \n", &presets()),
            InputAction::Command(BackendCommand::SelectLocation {
                raw: "Paris".into()
            })
        );
    }

    #[test]
    fn presets_are_one_based() {
        assert_eq!(
            parse_input(":3", &presets()),
            InputAction::Command(BackendCommand::SelectLocation {
                raw: "New York".into()
            })
        );
        assert!(matches!(
            parse_input(":0", &presets()),
            InputAction::Invalid(_)
        ));
        assert!(matches!(
            parse_input(":9", &presets()),
            InputAction::Invalid(_)
        ));
    }

    #[test]
    fn view_names_switch_view_case_insensitively() {
        assert_eq!(
            parse_input("view Forecast", &presets()),
            InputAction::Command(BackendCommand::SelectView {
                view: ActiveView::Forecast
            })
        );
        assert_eq!(
            parse_input("HEALTH", &presets()),
            InputAction::Command(BackendCommand::SelectView {
                view: ActiveView::Health
            })
        );
        assert!(matches!(
            parse_input("view map", &presets()),
            InputAction::Invalid(_)
        ));
    }

    #[test]
    fn city_prefix_forces_a_search() {
        assert_eq!(
            parse_input("city Health", &presets()),
            InputAction::Command(BackendCommand::SelectLocation {
                raw: "Health".into()
            })
        );
    }

    #[test]
    fn keywords() {
        assert_eq!(
            parse_input("refresh", &presets()),
            InputAction::Command(BackendCommand::Refresh)
        );
        assert_eq!(parse_input("quit", &presets()), InputAction::Quit);
        assert_eq!(parse_input("?", &presets()), InputAction::Help);
    }

    #[test]
    fn dispatch_reports_full_and_disconnected_queues() {
        let (tx, rx) = bounded(1);
        let mut status = String::new();

        dispatch_backend_command(&tx, BackendCommand::Refresh, &mut status);
        assert!(status.is_empty());

        dispatch_backend_command(&tx, BackendCommand::Refresh, &mut status);
        assert!(status.contains("full"));

        drop(rx);
        dispatch_backend_command(&tx, BackendCommand::Refresh, &mut status);
        assert!(status.contains("disconnected"));
    }
}
