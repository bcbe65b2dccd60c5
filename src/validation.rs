use thiserror::Error;

use crate::config::ValidationMode;
use crate::order::OrderForm;
use crate::utils::parse_number;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

type FieldGetter = fn(&OrderForm) -> &str;

const REQUIRED_FIELDS: [(&str, FieldGetter); 13] = [
    ("Order Type", |f| f.order_type.as_str()),
    ("Delivery or Pickup", |f| f.fulfillment.as_str()),
    ("Product", |f| f.product.as_str()),
    ("Quantity", |f| f.quantity.as_str()),
    ("Order Date", |f| f.order_date.as_str()),
    ("Requested Date", |f| f.requested_date.as_str()),
    ("Customer Name", |f| f.customer_name.as_str()),
    ("Email", |f| f.email.as_str()),
    ("Contact Number", |f| f.contact_number.as_str()),
    ("Delivery Address", |f| f.delivery_address.as_str()),
    ("Area", |f| f.area.as_str()),
    ("Order Total", |f| f.order_total.as_str()),
    ("Amount Paid", |f| f.amount_paid.as_str()),
];

/// Returns the first rule the form breaks.
pub fn validate(form: &OrderForm, mode: ValidationMode) -> Result<(), ValidationError> {
    if mode == ValidationMode::Strict {
        for (label, get) in REQUIRED_FIELDS {
            if get(form).trim().is_empty() {
                return Err(ValidationError(format!("{label} is required.")));
            }
        }
    }

    let min_quantity = match mode {
        ValidationMode::Lenient => 0.0,
        ValidationMode::Strict => 1.0,
    };
    optional_at_least(&form.quantity, min_quantity, || match mode {
        ValidationMode::Lenient => "Quantity must be 0 or greater.",
        ValidationMode::Strict => "Quantity must be at least 1.",
    })?;

    let order_total =
        optional_at_least(&form.order_total, 0.0, || "Order Total must be 0 or greater.")?;
    let amount_paid =
        optional_at_least(&form.amount_paid, 0.0, || "Amount Paid must be 0 or greater.")?;

    if let (Some(total), Some(paid)) = (order_total, amount_paid)
        && paid > total
    {
        return Err(ValidationError(
            "Amount Paid cannot exceed Order Total.".to_string(),
        ));
    }
    Ok(())
}

// Blank passes as `None`; anything else must be a number >= `min`.
fn optional_at_least(
    raw: &str,
    min: f64,
    message: impl FnOnce() -> &'static str,
) -> Result<Option<f64>, ValidationError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    match parse_number(raw) {
        Some(n) if n >= min => Ok(Some(n)),
        _ => Err(ValidationError(message().to_string())),
    }
}
