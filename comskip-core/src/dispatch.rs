//! Turns a matched interval into a seek and an optional notification.

use std::{any::type_name_of_val, fmt, sync::Arc};

use comskip_model::{SessionInfo, SessionKey, SkipInterval, Ticks};
use tracing::{debug, info, warn};

use crate::config::SkipperConfig;
use crate::ports::{MessageLocalizer, SessionCommands};

/// What happened to a matched interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The seek was sent to `control`; `notified` reports whether the
    /// on-screen message was delivered as well.
    Skipped { control: SessionKey, notified: bool },
    /// The reporting session is no longer known to the host.
    UnknownSession,
    /// Neither the session nor any session on its device accepts remote
    /// control.
    NoControlSession,
    SeekFailed,
}

#[derive(Clone)]
pub struct CommandDispatcher {
    commands: Arc<dyn SessionCommands>,
    localizer: Arc<dyn MessageLocalizer>,
}

impl fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("commands_type", &type_name_of_val(self.commands.as_ref()))
            .field("localizer_type", &type_name_of_val(self.localizer.as_ref()))
            .finish()
    }
}

impl CommandDispatcher {
    pub fn new(
        commands: Arc<dyn SessionCommands>,
        localizer: Arc<dyn MessageLocalizer>,
    ) -> Self {
        Self {
            commands,
            localizer,
        }
    }

    /// The session itself when it accepts remote control, otherwise the
    /// first other session on the same device that does.
    pub async fn resolve_control_session(
        &self,
        origin: &SessionInfo,
    ) -> Option<SessionInfo> {
        if origin.supports_remote_control {
            return Some(origin.clone());
        }

        self.commands.sessions().await.into_iter().find(|candidate| {
            candidate.key != origin.key
                && candidate.device_id == origin.device_id
                && candidate.supports_remote_control
        })
    }

    /// Seeks past `interval`, then tries to tell the viewer.
    ///
    /// The seek is attempted whenever a control session exists. A failed
    /// notification is logged and otherwise ignored.
    pub async fn dispatch(
        &self,
        origin: &SessionKey,
        interval: &SkipInterval,
        config: &SkipperConfig,
    ) -> DispatchOutcome {
        let Some(origin_info) = self.commands.session(origin).await else {
            debug!(target: "comskip::dispatch", session = %origin, "session vanished before skip");
            return DispatchOutcome::UnknownSession;
        };

        let Some(control) = self.resolve_control_session(&origin_info).await
        else {
            debug!(
                target: "comskip::dispatch",
                session = %origin,
                device = %origin_info.device_id,
                "no control session; dropping skip"
            );
            return DispatchOutcome::NoControlSession;
        };

        if let Err(err) = self.commands.seek(&control.key, interval.end).await {
            warn!(
                target: "comskip::dispatch",
                session = %origin,
                control = %control.key,
                error = %err,
                "seek command failed"
            );
            return DispatchOutcome::SeekFailed;
        }

        info!(
            target: "comskip::dispatch",
            session = %origin,
            control = %control.key,
            start = %interval.start,
            end = %interval.end,
            "skipping commercial"
        );

        // The message goes to the control session, so its capabilities
        // decide, not those of the session that reported progress.
        let notified = if !config.disable_message
            && control.supports_display_message()
        {
            self.notify(&control.key, interval.duration(), config).await
        } else {
            false
        };

        DispatchOutcome::Skipped {
            control: control.key,
            notified,
        }
    }

    async fn notify(
        &self,
        control: &SessionKey,
        skipped: Ticks,
        config: &SkipperConfig,
    ) -> bool {
        let text = notification_text(self.localizer.as_ref(), config, skipped);
        match self
            .commands
            .send_message(control, &text, config.message_timeout_ms())
            .await
        {
            Ok(()) => true,
            Err(err) => {
                debug!(
                    target: "comskip::dispatch",
                    control = %control,
                    error = %err,
                    "notification not delivered"
                );
                false
            }
        }
    }
}

/// Localized notification text, optionally suffixed with ` (m:ss)`.
pub fn notification_text(
    localizer: &dyn MessageLocalizer,
    config: &SkipperConfig,
    skipped: Ticks,
) -> String {
    let mut text =
        localizer.localize(&config.main_message_text, &config.ui_culture);
    if config.show_time_in_message {
        let secs = skipped.as_secs().max(0);
        text.push_str(&format!(" ({}:{:02})", secs / 60, secs % 60));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PassthroughLocalizer;

    struct Upper;

    impl MessageLocalizer for Upper {
        fn localize(&self, text: &str, locale: &str) -> String {
            format!("{}@{locale}", text.to_uppercase())
        }
    }

    #[test]
    fn plain_template_is_localized() {
        let config = SkipperConfig::default();
        let text = notification_text(&Upper, &config, Ticks::from_secs(95));
        assert_eq!(text, "COMMERCIAL SKIPPED@en-us");
    }

    #[test]
    fn duration_suffix_uses_minutes_and_padded_seconds() {
        let config = SkipperConfig {
            show_time_in_message: true,
            ..SkipperConfig::default()
        };
        let text =
            notification_text(&PassthroughLocalizer, &config, Ticks::from_secs(95));
        assert_eq!(text, "Commercial Skipped (1:35)");

        let short =
            notification_text(&PassthroughLocalizer, &config, Ticks::from_secs(7));
        assert_eq!(short, "Commercial Skipped (0:07)");
    }
}
