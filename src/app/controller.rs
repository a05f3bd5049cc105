//! Host-side state machine: actions in, effects out.
//!
//! # Purity Rules
//!
//! The controller MUST NOT spawn processes or tasks, and takes time as `now`.
//! Settings and options are read through the `WorkspaceConfig` and
//! `OptionsStore` ports only.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, warn};
use serde_json::Value;

use crate::action::Action;
use crate::domain::render_config::DEFAULT_DEBOUNCE;
use crate::domain::{PreviewSettings, RenderOptions, RenderTarget};
use crate::effect::Effect;
use crate::message::{ViewMessage, parse_view_message};
use crate::orchestrator::RenderOutcome;
use crate::ports::{OptionsStore, WorkspaceConfig};
use crate::session::PreviewSession;

pub struct Controller {
    sessions: HashMap<PathBuf, PreviewSession>,
    config: Arc<dyn WorkspaceConfig>,
    store: Arc<dyn OptionsStore>,
}

impl Controller {
    pub fn new(config: Arc<dyn WorkspaceConfig>, store: Arc<dyn OptionsStore>) -> Self {
        Self {
            sessions: HashMap::new(),
            config,
            store,
        }
    }

    pub fn session(&self, path: &Path) -> Option<&PreviewSession> {
        self.sessions.get(path)
    }

    /// Earliest pending debounce deadline across all previews.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.sessions
            .values()
            .filter_map(|session| session.pending_edit().deadline())
            .min()
    }

    pub fn handle(&mut self, action: Action, now: Instant) -> Vec<Effect> {
        match action {
            Action::Open { path, trusted } => self.open(path, trusted),
            Action::Saved { path } => self.saved(&path),
            Action::Changed { path, content } => self.changed(&path, content, now),
            Action::ViewMessage { path, message } => self.view_message(&path, &message),
            Action::DebounceElapsed => self.debounce_elapsed(now),
            Action::RenderFinished {
                path,
                generation,
                outcome,
            } => self.render_finished(&path, generation, outcome),
            Action::Close { path } => {
                self.sessions.remove(&path);
                vec![]
            }
            Action::Quit => vec![Effect::Exit],
        }
    }

    fn open(&mut self, path: PathBuf, trusted: bool) -> Vec<Effect> {
        let mut effects = Vec::new();

        if let Some(session) = self.sessions.get_mut(&path) {
            session.set_trusted(trusted);
        } else {
            let workspace = self.config.workspace_root(&path);
            let options = match self.store.load(&workspace) {
                Ok(options) => options.unwrap_or_default(),
                Err(e) => {
                    warn!("could not load options for {}: {}", workspace.display(), e);
                    effects.push(notify(&path, format!("Using default options: {}", e)));
                    RenderOptions::default()
                }
            };
            let session =
                PreviewSession::new(path.clone(), workspace, trusted, options, DEFAULT_DEBOUNCE);
            self.sessions.insert(path.clone(), session);
        }

        effects.extend(self.start_render(&path, None));
        effects
    }

    fn saved(&mut self, path: &Path) -> Vec<Effect> {
        let settings = match self.settings_for(path) {
            Some(Ok(settings)) => settings,
            Some(Err(effect)) => return vec![effect],
            None => return vec![],
        };
        let Some(session) = self.sessions.get_mut(path) else {
            return vec![];
        };
        session.mark_saved();

        if !settings.render_on_save {
            return vec![];
        }
        vec![Effect::Render(
            session.begin_render(settings, RenderTarget::File(path.to_path_buf())),
        )]
    }

    fn changed(&mut self, path: &Path, content: String, now: Instant) -> Vec<Effect> {
        let settings = match self.settings_for(path) {
            Some(Ok(settings)) => settings,
            Some(Err(effect)) => return vec![effect],
            None => return vec![],
        };
        if !settings.render_on_change {
            return vec![];
        }
        if let Some(session) = self.sessions.get_mut(path) {
            let pending = session.pending_edit_mut();
            pending.set_quiet(settings.debounce);
            pending.schedule(now, content);
        }
        vec![]
    }

    fn debounce_elapsed(&mut self, now: Instant) -> Vec<Effect> {
        let due: Vec<(PathBuf, String)> = self
            .sessions
            .iter_mut()
            .filter_map(|(path, session)| {
                session
                    .pending_edit_mut()
                    .take_due(now)
                    .map(|content| (path.clone(), content))
            })
            .collect();

        due.into_iter()
            .flat_map(|(path, content)| {
                let target = RenderTarget::Unsaved {
                    path: path.clone(),
                    content,
                };
                self.start_render(&path, Some(target))
            })
            .collect()
    }

    fn view_message(&mut self, path: &Path, message: &Value) -> Vec<Effect> {
        let message = match parse_view_message(message) {
            Ok(message) => message,
            Err(e) => {
                warn!("rejected view message: {}", e);
                return vec![notify(path, e.to_string())];
            }
        };
        let Some(session) = self.sessions.get_mut(path) else {
            debug!("view message for closed preview {}", path.display());
            return vec![];
        };

        let options = match message {
            ViewMessage::UpdateSettings(options) => options,
            ViewMessage::ResetSettings => RenderOptions::default(),
        };
        session.set_options(options);

        let mut effects = Vec::new();
        if let Err(e) = self.store.save(session.workspace(), &options) {
            warn!("could not persist options: {}", e);
            effects.push(notify(path, format!("Options were not saved: {}", e)));
        }
        effects.extend(self.start_render(path, None));
        effects
    }

    fn render_finished(
        &mut self,
        path: &Path,
        generation: u64,
        outcome: RenderOutcome,
    ) -> Vec<Effect> {
        let Some(session) = self.sessions.get_mut(path) else {
            return vec![];
        };

        if let RenderOutcome::Skipped(notice) = &outcome {
            return vec![notify(path, notice.to_string())];
        }
        if !session.complete(generation, outcome.clone()) {
            debug!("dropping stale render #{} for {}", generation, path.display());
            return vec![];
        }

        vec![Effect::ShowDocument {
            path: path.to_path_buf(),
            generation,
            outcome,
            options: *session.options(),
        }]
    }

    /// Starts a render of `target`, or of the session's current target.
    fn start_render(&mut self, path: &Path, target: Option<RenderTarget>) -> Vec<Effect> {
        let settings = match self.settings_for(path) {
            Some(Ok(settings)) => settings,
            Some(Err(effect)) => return vec![effect],
            None => return vec![],
        };
        let Some(session) = self.sessions.get_mut(path) else {
            return vec![];
        };

        let target = target.unwrap_or_else(|| session.current_target());
        vec![Effect::Render(session.begin_render(settings, target))]
    }

    /// Fresh settings for an open preview; `None` when no preview is open.
    fn settings_for(&self, path: &Path) -> Option<Result<PreviewSettings, Effect>> {
        let session = self.sessions.get(path)?;
        Some(
            self.config
                .load_settings(session.workspace())
                .map_err(|e| {
                    warn!("could not load settings: {}", e);
                    notify(path, e.to_string())
                }),
        )
    }
}

fn notify(path: &Path, message: String) -> Effect {
    Effect::Notify {
        path: Some(path.to_path_buf()),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RenderResult, Theme};
    use crate::ports::options_store::MockOptionsStore;
    use crate::ports::workspace_config::MockWorkspaceConfig;
    use crate::ports::{ConfigError, OptionsStoreError};
    use crate::precondition::Notice;
    use serde_json::json;
    use std::time::Duration;

    const FILE: &str = "/ws/rtl/alu.sv";

    fn config_with(settings: PreviewSettings) -> MockWorkspaceConfig {
        let mut config = MockWorkspaceConfig::new();
        config
            .expect_workspace_root()
            .returning(|_| PathBuf::from("/ws"));
        config
            .expect_load_settings()
            .returning(move |_| Ok(settings.clone()));
        config
    }

    fn quiet_store() -> MockOptionsStore {
        let mut store = MockOptionsStore::new();
        store.expect_load().returning(|_| Ok(None));
        store.expect_save().returning(|_, _| Ok(()));
        store
    }

    fn controller(settings: PreviewSettings, store: MockOptionsStore) -> Controller {
        Controller::new(Arc::new(config_with(settings)), Arc::new(store))
    }

    fn open(controller: &mut Controller) -> Vec<Effect> {
        controller.handle(
            Action::Open {
                path: PathBuf::from(FILE),
                trusted: true,
            },
            Instant::now(),
        )
    }

    fn ticket(effects: &[Effect]) -> &crate::session::RenderTicket {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::Render(ticket) => Some(ticket),
                _ => None,
            })
            .expect("no render effect")
    }

    mod open {
        use super::*;

        #[test]
        fn renders_file_with_persisted_options() {
            let mut store = MockOptionsStore::new();
            store
                .expect_load()
                .withf(|workspace| workspace == Path::new("/ws"))
                .returning(|_| {
                    Ok(Some(RenderOptions {
                        theme: Theme::Midnight,
                        ..Default::default()
                    }))
                });
            let mut controller = controller(PreviewSettings::default(), store);

            let effects = open(&mut controller);

            let ticket = ticket(&effects);
            assert_eq!(ticket.request.options.theme, Theme::Midnight);
            assert_eq!(
                ticket.request.target,
                Some(RenderTarget::File(PathBuf::from(FILE)))
            );
            assert!(ticket.request.trusted);
        }

        #[test]
        fn unreadable_options_fall_back_to_defaults_with_notice() {
            let mut store = MockOptionsStore::new();
            store
                .expect_load()
                .returning(|_| Err(OptionsStoreError::InvalidFormat("bad toml".into())));
            let mut controller = controller(PreviewSettings::default(), store);

            let effects = open(&mut controller);

            assert!(matches!(effects[0], Effect::Notify { .. }));
            assert!(ticket(&effects).request.options.is_default());
        }

        #[test]
        fn settings_error_is_reported_instead_of_rendering() {
            let mut config = MockWorkspaceConfig::new();
            config
                .expect_workspace_root()
                .returning(|_| PathBuf::from("/ws"));
            config.expect_load_settings().returning(|_| {
                Err(ConfigError::Invalid {
                    path: PathBuf::from("/ws/.svschem.toml"),
                    message: "expected a boolean".into(),
                })
            });
            let mut controller = Controller::new(Arc::new(config), Arc::new(quiet_store()));

            let effects = open(&mut controller);

            assert_eq!(effects.len(), 1);
            let Effect::Notify { message, .. } = &effects[0] else {
                panic!("expected notify, got {:?}", effects[0]);
            };
            assert!(message.contains("expected a boolean"));
        }
    }

    mod saved {
        use super::*;

        #[test]
        fn renders_when_render_on_save_is_enabled() {
            let mut controller = controller(PreviewSettings::default(), quiet_store());
            open(&mut controller);

            let effects = controller.handle(
                Action::Saved {
                    path: PathBuf::from(FILE),
                },
                Instant::now(),
            );

            assert_eq!(ticket(&effects).generation, 2);
        }

        #[test]
        fn does_nothing_when_render_on_save_is_disabled() {
            let settings = PreviewSettings {
                render_on_save: false,
                ..Default::default()
            };
            let mut controller = controller(settings, quiet_store());
            open(&mut controller);

            let effects = controller.handle(
                Action::Saved {
                    path: PathBuf::from(FILE),
                },
                Instant::now(),
            );

            assert!(effects.is_empty());
        }

        #[test]
        fn ignores_files_without_preview() {
            let mut controller = controller(PreviewSettings::default(), quiet_store());

            let effects = controller.handle(
                Action::Saved {
                    path: PathBuf::from("/ws/other.sv"),
                },
                Instant::now(),
            );

            assert!(effects.is_empty());
        }
    }

    mod changed {
        use super::*;

        fn live_settings() -> PreviewSettings {
            PreviewSettings {
                render_on_change: true,
                debounce: Duration::from_millis(500),
                ..Default::default()
            }
        }

        fn change(controller: &mut Controller, content: &str, now: Instant) {
            let effects = controller.handle(
                Action::Changed {
                    path: PathBuf::from(FILE),
                    content: content.to_string(),
                },
                now,
            );
            assert!(effects.is_empty());
        }

        #[test]
        fn only_latest_edit_renders_after_quiet_period() {
            let mut controller = controller(live_settings(), quiet_store());
            open(&mut controller);
            let start = Instant::now();

            change(&mut controller, "module a; endmodule", start);
            change(
                &mut controller,
                "module b; endmodule",
                start + Duration::from_millis(200),
            );

            let early = controller.handle(
                Action::DebounceElapsed,
                start + Duration::from_millis(600),
            );
            assert!(early.is_empty());
            assert_eq!(
                controller.next_deadline(),
                Some(start + Duration::from_millis(700))
            );

            let effects = controller.handle(
                Action::DebounceElapsed,
                start + Duration::from_millis(700),
            );
            assert_eq!(
                ticket(&effects).request.target,
                Some(RenderTarget::Unsaved {
                    path: PathBuf::from(FILE),
                    content: "module b; endmodule".to_string(),
                })
            );
            assert_eq!(controller.next_deadline(), None);
        }

        #[test]
        fn edits_are_ignored_without_render_on_change() {
            let mut controller = controller(PreviewSettings::default(), quiet_store());
            open(&mut controller);

            change(&mut controller, "module a; endmodule", Instant::now());

            assert_eq!(controller.next_deadline(), None);
        }
    }

    mod view_message {
        use super::*;

        fn message(controller: &mut Controller, message: Value) -> Vec<Effect> {
            controller.handle(
                Action::ViewMessage {
                    path: PathBuf::from(FILE),
                    message,
                },
                Instant::now(),
            )
        }

        #[test]
        fn update_settings_persists_and_rerenders() {
            let mut store = MockOptionsStore::new();
            store.expect_load().returning(|_| Ok(None));
            store
                .expect_save()
                .withf(|workspace, options| {
                    workspace == Path::new("/ws") && options.theme == Theme::Blueprint
                })
                .times(1)
                .returning(|_, _| Ok(()));
            let mut controller = controller(PreviewSettings::default(), store);
            open(&mut controller);

            let effects = message(
                &mut controller,
                json!({"command": "updateSettings", "settings": {"theme": "blueprint"}}),
            );

            assert_eq!(ticket(&effects).request.options.theme, Theme::Blueprint);
            assert_eq!(
                controller.session(Path::new(FILE)).unwrap().options().theme,
                Theme::Blueprint
            );
        }

        #[test]
        fn reset_settings_restores_defaults() {
            let mut controller = controller(PreviewSettings::default(), quiet_store());
            open(&mut controller);
            message(
                &mut controller,
                json!({"command": "updateSettings", "settings": {"table": true}}),
            );

            let effects = message(&mut controller, json!({"command": "resetSettings"}));

            assert!(ticket(&effects).request.options.is_default());
        }

        #[test]
        fn rerender_keeps_unsaved_content() {
            let settings = PreviewSettings {
                render_on_change: true,
                ..Default::default()
            };
            let mut controller = controller(settings, quiet_store());
            open(&mut controller);
            let start = Instant::now();
            controller.handle(
                Action::Changed {
                    path: PathBuf::from(FILE),
                    content: "module draft; endmodule".to_string(),
                },
                start,
            );
            controller.handle(Action::DebounceElapsed, start + Duration::from_secs(1));

            let effects = message(
                &mut controller,
                json!({"command": "updateSettings", "settings": {"gridX": 2}}),
            );

            assert!(matches!(
                ticket(&effects).request.target,
                Some(RenderTarget::Unsaved { .. })
            ));
        }

        #[test]
        fn malformed_message_is_reported() {
            let mut controller = controller(PreviewSettings::default(), quiet_store());
            open(&mut controller);

            let effects = message(&mut controller, json!({"command": "explode"}));

            assert_eq!(effects.len(), 1);
            assert!(matches!(effects[0], Effect::Notify { .. }));
        }
    }

    mod render_finished {
        use super::*;

        fn finished(controller: &mut Controller, generation: u64, outcome: RenderOutcome) -> Vec<Effect> {
            controller.handle(
                Action::RenderFinished {
                    path: PathBuf::from(FILE),
                    generation,
                    outcome,
                },
                Instant::now(),
            )
        }

        fn svg(id: &str) -> RenderOutcome {
            RenderOutcome::Rendered(RenderResult::Success {
                svg: format!("<svg id=\"{}\"/>", id),
            })
        }

        #[test]
        fn newest_result_is_shown_and_stale_one_dropped() {
            let mut controller = controller(PreviewSettings::default(), quiet_store());
            open(&mut controller);
            controller.handle(
                Action::Saved {
                    path: PathBuf::from(FILE),
                },
                Instant::now(),
            );

            let shown = finished(&mut controller, 2, svg("new"));
            let stale = finished(&mut controller, 1, svg("old"));

            assert!(matches!(shown[0], Effect::ShowDocument { generation: 2, .. }));
            assert!(stale.is_empty());
        }

        #[test]
        fn skipped_render_becomes_notice() {
            let mut controller = controller(PreviewSettings::default(), quiet_store());
            open(&mut controller);

            let effects = finished(&mut controller, 1, RenderOutcome::Skipped(Notice::Untrusted));

            assert_eq!(
                effects,
                vec![Effect::Notify {
                    path: Some(PathBuf::from(FILE)),
                    message: Notice::Untrusted.to_string(),
                }]
            );
            assert!(controller.session(Path::new(FILE)).unwrap().displayed().is_none());
        }

        #[test]
        fn closed_preview_ignores_late_results() {
            let mut controller = controller(PreviewSettings::default(), quiet_store());
            open(&mut controller);
            controller.handle(
                Action::Close {
                    path: PathBuf::from(FILE),
                },
                Instant::now(),
            );

            assert!(finished(&mut controller, 1, svg("late")).is_empty());
        }
    }

    #[test]
    fn quit_exits() {
        let mut controller = controller(PreviewSettings::default(), quiet_store());

        assert_eq!(controller.handle(Action::Quit, Instant::now()), vec![Effect::Exit]);
    }
}
