use std::sync::Arc;
use std::thread;

use slint::ComponentHandle;
use tracing::{debug, info, warn};

use crate::api::{ApiError, OrderBackend, PLACEHOLDER_CAMPAIGN, SubmitResponse};
use crate::config::AfterSuccess;
use crate::form_display::{
    clear_fields, clear_insights, hide_message, read_form, render_barcodes, render_campaigns,
    render_insights, render_submit_button, show_message,
};
use crate::insights::{InsightsRange, week_to_date};
use crate::submission::NETWORK_FAILURE_MESSAGE;
use crate::types::{SharedSession, lock_session};
use crate::utils::{format_date, mask_contact_number, today_in};

const INSIGHTS_UNREADABLE_MESSAGE: &str = "The server sent insights this form could not read.";

/// Backend handle shared with request threads.
pub type Backend = Arc<dyn OrderBackend>;

pub fn setup_event_handlers(session: SharedSession, backend: Backend, ui: &crate::ui::MainWindow) {
    let ui_handle = ui.as_weak();

    let ui_handle_submit = ui_handle.clone();
    let session_submit = session.clone();
    let backend_submit = backend.clone();
    ui.on_submit(move || {
        let Some(ui) = ui_handle_submit.upgrade() else {
            return;
        };
        let mut guard = lock_session(&session_submit);

        if guard.controller.in_reentry_mode() {
            // "Add Another Order"
            drop(guard);
            crate::ui_setup::reset_form(&ui, &session_submit);
            return;
        }

        hide_message(&ui);
        let form = read_form(&ui);
        let state = &mut *guard;
        let payload = match state.controller.begin(&form, &state.barcodes) {
            Ok(payload) => payload,
            Err(e) => {
                info!("Submission blocked: {e}");
                show_message(&ui, &e.to_string(), true);
                render_submit_button(&ui, &guard.controller);
                return;
            }
        };
        render_submit_button(&ui, &guard.controller);
        drop(guard);

        let backend = backend_submit.clone();
        let session = session_submit.clone();
        let ui_handle = ui_handle_submit.clone();
        thread::spawn(move || {
            let result = backend.submit_order(&payload);
            let session_done = session.clone();
            let delivered = ui_handle.upgrade_in_event_loop(move |ui| {
                finish_submission(&ui, &session_done, &backend, result);
            });
            if let Err(e) = delivered {
                // Window is gone; nothing left to show the outcome on.
                warn!("Dropping submission result: {e}");
                let mut guard = lock_session(&session);
                guard.controller.settle();
            }
        });
    });

    let ui_handle_scan = ui_handle.clone();
    let session_scan = session.clone();
    ui.on_barcode_scanned(move |raw| {
        let Some(ui) = ui_handle_scan.upgrade() else {
            return;
        };
        ui.set_scan_input(Default::default());
        let mut guard = lock_session(&session_scan);
        if !guard.scan(&raw, chrono::Utc::now()) {
            debug!("Scan ignored: {:?}", raw.as_str());
            return;
        }
        debug!(items = guard.barcodes.len(), "Barcode scanned");
        render_barcodes(&ui, &guard.barcodes);
    });

    let ui_handle_entered = ui_handle.clone();
    let session_entered = session.clone();
    ui.on_barcode_entered(move |raw| {
        let Some(ui) = ui_handle_entered.upgrade() else {
            return;
        };
        let mut guard = lock_session(&session_entered);
        if guard.barcodes.add_code(&raw) {
            ui.set_scan_input(Default::default());
            render_barcodes(&ui, &guard.barcodes);
        }
    });

    let ui_handle_qty = ui_handle.clone();
    let session_qty = session.clone();
    ui.on_change_quantity(move |index, delta| {
        let Some(ui) = ui_handle_qty.upgrade() else {
            return;
        };
        let mut guard = lock_session(&session_qty);
        match usize::try_from(index) {
            Ok(index) => {
                if let Err(e) = guard.barcodes.change_quantity(index, i64::from(delta)) {
                    warn!("Quantity change ignored: {e}");
                }
            }
            Err(_) => warn!("Quantity change ignored: negative index {index}"),
        }
        render_barcodes(&ui, &guard.barcodes);
    });

    let ui_handle_remove = ui_handle.clone();
    let session_remove = session.clone();
    ui.on_remove_barcode(move |index| {
        let Some(ui) = ui_handle_remove.upgrade() else {
            return;
        };
        let mut guard = lock_session(&session_remove);
        match usize::try_from(index) {
            Ok(index) => {
                if let Err(e) = guard.barcodes.remove_code(index) {
                    warn!("Remove ignored: {e}");
                }
            }
            Err(_) => warn!("Remove ignored: negative index {index}"),
        }
        render_barcodes(&ui, &guard.barcodes);
    });

    let ui_handle_clear = ui_handle.clone();
    let session_clear = session.clone();
    ui.on_clear_barcodes(move || {
        if let Some(ui) = ui_handle_clear.upgrade() {
            let mut guard = lock_session(&session_clear);
            guard.barcodes.clear();
            render_barcodes(&ui, &guard.barcodes);
        }
    });

    let ui_handle_phone = ui_handle.clone();
    ui.on_contact_number_committed(move |text| {
        if let Some(ui) = ui_handle_phone.upgrade() {
            let masked = mask_contact_number(&text);
            if masked != text.as_str() {
                ui.set_contact_number(masked.into());
            }
        }
    });

    let ui_handle_campaigns = ui_handle.clone();
    let backend_campaigns = backend.clone();
    ui.on_refresh_campaigns(move || {
        refresh_campaigns(&ui_handle_campaigns, &backend_campaigns);
    });

    let ui_handle_open = ui_handle.clone();
    let backend_open = backend.clone();
    let tz = lock_session(&session).config().timezone;
    ui.on_open_insights(move || {
        if let Some(ui) = ui_handle_open.upgrade() {
            if ui.get_insights_from().is_empty() || ui.get_insights_to().is_empty() {
                let (from, to) = week_to_date(today_in(tz));
                ui.set_insights_from(format_date(from).into());
                ui.set_insights_to(format_date(to).into());
            }
            ui.set_show_insights(true);
            load_insights(&ui, &backend_open);
        }
    });

    let ui_handle_load = ui_handle.clone();
    let backend_load = backend.clone();
    ui.on_load_insights(move || {
        if let Some(ui) = ui_handle_load.upgrade() {
            load_insights(&ui, &backend_load);
        }
    });

    let ui_handle_close = ui_handle.clone();
    ui.on_close_insights(move || {
        if let Some(ui) = ui_handle_close.upgrade() {
            ui.set_show_insights(false);
        }
    });
}

fn finish_submission(
    ui: &crate::ui::MainWindow,
    session: &SharedSession,
    backend: &Backend,
    result: Result<SubmitResponse, ApiError>,
) {
    let mut guard = lock_session(session);
    let outcome = guard.controller.complete(result);

    if outcome.is_saved() {
        show_message(ui, outcome.message(), false);
        clear_fields(ui, guard.config().timezone);
        guard.barcodes.clear();
        render_barcodes(ui, &guard.barcodes);

        if guard.config().after_success == AfterSuccess::Reload {
            let delay = guard.config().reload_delay;
            crate::timers::schedule_form_reset(ui.as_weak(), session.clone(), backend.clone(), delay);
        }
    } else {
        show_message(ui, outcome.message(), true);
    }

    guard.controller.settle();
    render_submit_button(ui, &guard.controller);
}

pub fn refresh_campaigns(ui_handle: &slint::Weak<crate::ui::MainWindow>, backend: &Backend) {
    let ui_handle = ui_handle.clone();
    let backend = backend.clone();
    thread::spawn(move || {
        let campaigns = backend.campaigns().unwrap_or_else(|e| {
            warn!("Could not load campaigns: {e}");
            vec![PLACEHOLDER_CAMPAIGN.to_string()]
        });
        info!(count = campaigns.len(), "Campaigns loaded");
        if let Err(e) = ui_handle.upgrade_in_event_loop(move |ui| render_campaigns(&ui, campaigns)) {
            warn!("Dropping campaign list: {e}");
        }
    });
}

fn load_insights(ui: &crate::ui::MainWindow, backend: &Backend) {
    let range = match InsightsRange::from_selection(
        &ui.get_insights_range(),
        &ui.get_insights_from(),
        &ui.get_insights_to(),
    ) {
        Ok(range) => range,
        Err(e) => {
            clear_insights(ui, &e.to_string());
            return;
        }
    };

    ui.set_insights_loading(true);
    clear_insights(ui, "Loading…");

    let ui_handle = ui.as_weak();
    let backend = backend.clone();
    thread::spawn(move || {
        let result = backend.insights(&range);
        let delivered = ui_handle.upgrade_in_event_loop(move |ui| {
            ui.set_insights_loading(false);
            match result {
                Ok(insights) => render_insights(&ui, &insights),
                Err(ApiError::Backend(message)) => clear_insights(&ui, &message),
                Err(e @ ApiError::Decode(_)) => {
                    warn!("Unreadable insights reply: {e}");
                    clear_insights(&ui, INSIGHTS_UNREADABLE_MESSAGE);
                }
                Err(e) => {
                    warn!("Could not load insights: {e}");
                    clear_insights(&ui, NETWORK_FAILURE_MESSAGE);
                }
            }
        });
        if let Err(e) = delivered {
            warn!("Dropping insights: {e}");
        }
    });
}
