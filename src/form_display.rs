use slint::{Model, ModelRc, SharedString, VecModel};
use std::rc::Rc;

use chrono_tz::Tz;

use crate::api::PLACEHOLDER_CAMPAIGN;
use crate::barcode::BarcodeList;
use crate::insights::Insights;
use crate::order::OrderForm;
use crate::submission::SubmissionController;
use crate::ui::{BarcodeRow, InsightRow, MainWindow};
use crate::utils::{format_date, today_in};

pub fn read_form(ui: &MainWindow) -> OrderForm {
    OrderForm {
        chatwoot_id: ui.get_chatwoot_id().to_string(),
        order_type: ui.get_order_type().to_string(),
        fulfillment: ui.get_fulfillment().to_string(),
        product: ui.get_product().to_string(),
        quantity: ui.get_quantity().to_string(),
        order_date: ui.get_order_date().to_string(),
        requested_date: ui.get_requested_date().to_string(),
        customer_name: ui.get_customer_name().to_string(),
        email: ui.get_email().to_string(),
        contact_number: ui.get_contact_number().to_string(),
        delivery_address: ui.get_delivery_address().to_string(),
        area: ui.get_area().to_string(),
        invoice_no: ui.get_invoice_no().to_string(),
        order_total: ui.get_order_total().to_string(),
        amount_paid: ui.get_amount_paid().to_string(),
        campaign: selected_campaign(&ui.get_campaign()),
    }
}

// The placeholder entry means "no campaign", which the sheet stores as blank.
fn selected_campaign(value: &str) -> String {
    if value == PLACEHOLDER_CAMPAIGN {
        String::new()
    } else {
        value.to_string()
    }
}

/// Blanks every order field; the order date goes back to today and the
/// campaign to the first entry.
pub fn clear_fields(ui: &MainWindow, tz: Tz) {
    let blank = SharedString::new;
    ui.set_chatwoot_id(blank());
    ui.set_order_type(blank());
    ui.set_fulfillment(blank());
    ui.set_product(blank());
    ui.set_quantity(blank());
    ui.set_order_date(format_date(today_in(tz)).into());
    ui.set_requested_date(blank());
    ui.set_customer_name(blank());
    ui.set_email(blank());
    ui.set_contact_number(blank());
    ui.set_delivery_address(blank());
    ui.set_area(blank());
    ui.set_invoice_no(blank());
    ui.set_order_total(blank());
    ui.set_amount_paid(blank());
    ui.set_scan_input(blank());

    let first_campaign = ui
        .get_campaigns()
        .row_data(0)
        .unwrap_or_else(|| PLACEHOLDER_CAMPAIGN.into());
    ui.set_campaign(first_campaign);
}

pub fn show_message(ui: &MainWindow, text: &str, is_error: bool) {
    ui.set_message_text(text.into());
    ui.set_message_is_error(is_error);
}

pub fn hide_message(ui: &MainWindow) {
    ui.set_message_text(SharedString::new());
    ui.set_message_is_error(false);
}

pub fn render_barcodes(ui: &MainWindow, barcodes: &BarcodeList) {
    let rows: Vec<BarcodeRow> = barcodes
        .rows()
        .into_iter()
        .map(|row| BarcodeRow {
            code: SharedString::from(row.barcode),
            quantity: i32::try_from(row.quantity).unwrap_or(i32::MAX),
        })
        .collect();
    ui.set_barcodes(ModelRc::from(Rc::new(VecModel::from(rows))));
    ui.set_barcodes_serialized(barcodes.serialize().into());
    ui.set_barcode_total(i32::try_from(barcodes.total_quantity()).unwrap_or(i32::MAX));
}

pub fn render_submit_button(ui: &MainWindow, controller: &SubmissionController) {
    ui.set_submitting(controller.is_submitting());
    ui.set_submit_label(controller.button_label().into());
}

pub fn render_campaigns(ui: &MainWindow, campaigns: Vec<String>) {
    let current = ui.get_campaign();
    let keep = campaigns.iter().any(|c| c.as_str() == current.as_str());
    if !keep {
        ui.set_campaign(campaigns.first().cloned().unwrap_or_default().into());
    }
    let names: Vec<SharedString> = campaigns.into_iter().map(SharedString::from).collect();
    ui.set_campaigns(ModelRc::from(Rc::new(VecModel::from(names))));
}

pub fn render_insights(ui: &MainWindow, insights: &Insights) {
    let rows: Vec<InsightRow> = insights
        .rows()
        .into_iter()
        .map(|(label, value)| InsightRow {
            label: label.into(),
            value: i32::try_from(value).unwrap_or(i32::MAX),
        })
        .collect();
    let status = if rows.is_empty() { "No orders for this range." } else { "" };
    ui.set_insight_rows(ModelRc::from(Rc::new(VecModel::from(rows))));
    ui.set_insights_status(status.into());
}

pub fn clear_insights(ui: &MainWindow, status: &str) {
    ui.set_insight_rows(ModelRc::from(Rc::new(VecModel::<InsightRow>::default())));
    ui.set_insights_status(status.into());
}
