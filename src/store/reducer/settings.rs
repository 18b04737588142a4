use std::sync::Arc;

use crate::domain::Settings;

use super::super::action::Action;

/// Reduces the settings.
///
/// `SET_SETTING` replaces a single value; `SET_STATE` merges the snapshot's
/// settings over the current ones, leaving unnamed settings untouched.
pub fn reduce(mut state: Arc<Settings>, action: &Action) -> Arc<Settings> {
    match action {
        Action::SetSetting { name, value } => {
            if state.get(*name) == Some(value) {
                return state;
            }
            Arc::make_mut(&mut state).set(*name, value.clone());
            state
        }
        Action::SetState { state: snapshot } => {
            let Some(patch) = &snapshot.settings else {
                return state;
            };
            let entries = patch.entries();
            if entries
                .iter()
                .all(|(name, value)| state.get(*name) == Some(value))
            {
                return state;
            }
            let settings = Arc::make_mut(&mut state);
            for (name, value) in entries {
                settings.set(name, value);
            }
            state
        }
        _ => state,
    }
}
