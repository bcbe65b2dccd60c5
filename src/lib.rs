//! Order entry for a flower shop.
//!
//! A desktop form that collects order details, aggregates scanned barcodes,
//! validates locally and posts the order as JSON to a spreadsheet-backed
//! endpoint. The form logic (`barcode`, `validation`, `order`, `submission`,
//! `insights`, `api`) has no UI dependency; the remaining modules wire it to
//! the Slint window in `ui/app.slint`.

pub mod api;
pub mod barcode;
pub mod config;
pub mod event_handlers;
pub mod form_display;
pub mod insights;
pub mod order;
pub mod submission;
pub mod timers;
pub mod types;
pub mod ui_setup;
pub mod utils;
pub mod validation;

pub mod ui {
    slint::include_modules!();
}
