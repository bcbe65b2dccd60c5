use std::time::Duration;

use tracing::debug;

use crate::types::SharedSession;

/// Resets the whole form once the success message has been visible for `delay`.
pub fn schedule_form_reset(
    ui_handle: slint::Weak<crate::ui::MainWindow>,
    session: SharedSession,
    backend: crate::event_handlers::Backend,
    delay: Duration,
) {
    debug!(?delay, "Form reset scheduled");
    slint::Timer::single_shot(delay, move || {
        if let Some(ui) = ui_handle.upgrade() {
            crate::ui_setup::reset_form(&ui, &session);
            crate::event_handlers::refresh_campaigns(&ui_handle, &backend);
        }
    });
}
