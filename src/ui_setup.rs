use slint::{ComponentHandle, ModelRc, SharedString, VecModel};
use std::rc::Rc;

use crate::api::PLACEHOLDER_CAMPAIGN;
use crate::event_handlers::{Backend, refresh_campaigns};
use crate::form_display::{
    clear_fields, hide_message, render_barcodes, render_campaigns, render_submit_button,
};
use crate::order::Fulfillment;
use crate::types::{SharedSession, lock_session};

pub fn initialize_ui_and_data(
    ui: &crate::ui::MainWindow,
    session: &SharedSession,
    backend: &Backend,
) -> Result<(), Box<dyn std::error::Error>> {
    let options: Vec<SharedString> = Fulfillment::ALL
        .into_iter()
        .map(|f| SharedString::from(f.as_str()))
        .collect();
    ui.set_fulfillment_options(ModelRc::from(Rc::new(VecModel::from(options))));

    reset_form(ui, session);

    // Campaigns arrive asynchronously; the dropdown shows the placeholder until then
    render_campaigns(ui, vec![PLACEHOLDER_CAMPAIGN.to_string()]);
    refresh_campaigns(&ui.as_weak(), backend);

    Ok(())
}

/// Fresh form: no message, empty fields and barcodes, controller back to "Save".
pub fn reset_form(ui: &crate::ui::MainWindow, session: &SharedSession) {
    let mut session = lock_session(session);
    session.start_new_order();

    hide_message(ui);
    clear_fields(ui, session.config().timezone);
    render_barcodes(ui, &session.barcodes);
    render_submit_button(ui, &session.controller);
}
