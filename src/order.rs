//! Form fields and the JSON body posted to the order sheet.

use serde::{Serialize, Serializer};

use crate::barcode::BarcodeList;
use crate::utils::{mask_contact_number, parse_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fulfillment {
    Pickup,
    Delivery,
    PriorityDelivery,
}

impl Fulfillment {
    pub const ALL: [Fulfillment; 3] = [
        Fulfillment::Pickup,
        Fulfillment::Delivery,
        Fulfillment::PriorityDelivery,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Fulfillment::Pickup => "Pickup",
            Fulfillment::Delivery => "Delivery",
            Fulfillment::PriorityDelivery => "Priority Delivery",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s.trim())
    }
}

/// Raw control values, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderForm {
    pub chatwoot_id: String,
    pub order_type: String,
    pub fulfillment: String,
    pub product: String,
    pub quantity: String,
    pub order_date: String,
    pub requested_date: String,
    pub customer_name: String,
    pub email: String,
    pub contact_number: String,
    pub delivery_address: String,
    pub area: String,
    pub invoice_no: String,
    pub order_total: String,
    pub amount_paid: String,
    pub campaign: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub chatwoot_id: String,
    pub order_type: String,
    pub fulfillment: String,
    pub product: String,
    #[serde(serialize_with = "number_or_blank")]
    pub quantity: Option<f64>,
    pub order_date: String,
    pub requested_date: String,
    pub customer_name: String,
    pub email: String,
    pub contact_number: String,
    pub delivery_address: String,
    pub area: String,
    pub invoice_no: String,
    #[serde(serialize_with = "number_or_blank")]
    pub order_total: Option<f64>,
    #[serde(serialize_with = "number_or_blank")]
    pub amount_paid: Option<f64>,
    pub campaign: String,
    pub barcodes: String,
    pub token: String,
}

// The sheet expects "" for a blank numeric cell.
fn number_or_blank<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(n) => serializer.serialize_f64(*n),
        None => serializer.serialize_str(""),
    }
}

impl OrderForm {
    pub fn to_payload(&self, barcodes: &BarcodeList, token: &str) -> OrderPayload {
        OrderPayload {
            chatwoot_id: self.chatwoot_id.trim().to_string(),
            order_type: self.order_type.trim().to_string(),
            fulfillment: self.fulfillment.trim().to_string(),
            product: self.product.trim().to_string(),
            quantity: parse_number(&self.quantity),
            order_date: self.order_date.trim().to_string(),
            requested_date: self.requested_date.trim().to_string(),
            customer_name: self.customer_name.trim().to_string(),
            email: self.email.trim().to_string(),
            contact_number: mask_contact_number(&self.contact_number),
            delivery_address: self.delivery_address.trim().to_string(),
            area: self.area.trim().to_string(),
            invoice_no: self.invoice_no.trim().to_string(),
            order_total: parse_number(&self.order_total),
            amount_paid: parse_number(&self.amount_paid),
            campaign: self.campaign.trim().to_string(),
            barcodes: barcodes.serialize(),
            token: token.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_uses_sheet_field_names_and_blank_numbers() {
        let form = OrderForm {
            chatwoot_id: " 42 ".into(),
            fulfillment: "Delivery".into(),
            product: " Red Roses ".into(),
            quantity: "12".into(),
            contact_number: "(0917) 555-1234".into(),
            order_total: "".into(),
            amount_paid: "  ".into(),
            ..OrderForm::default()
        };
        let mut barcodes = BarcodeList::new();
        barcodes.add_code("ROSE");
        barcodes.add_code("ROSE");

        let value = serde_json::to_value(form.to_payload(&barcodes, "secret")).unwrap();
        assert_eq!(value["chatwootId"], json!("42"));
        assert_eq!(value["product"], json!("Red Roses"));
        assert_eq!(value["quantity"], json!(12.0));
        assert_eq!(value["orderTotal"], json!(""));
        assert_eq!(value["amountPaid"], json!(""));
        assert_eq!(value["contactNumber"], json!("09175551234"));
        assert_eq!(value["barcodes"], json!("ROSE×2"));
        assert_eq!(value["token"], json!("secret"));
        assert!(value.get("invoiceNo").is_some());
        assert!(value.get("deliveryAddress").is_some());
    }

    #[test]
    fn digitless_contact_number_is_sent_as_typed() {
        let form = OrderForm {
            contact_number: "  n/a ".into(),
            ..OrderForm::default()
        };
        let payload = form.to_payload(&BarcodeList::new(), "secret");
        assert_eq!(payload.contact_number, "n/a");
    }

    #[test]
    fn fulfillment_wire_names() {
        assert_eq!(
            Fulfillment::parse("Priority Delivery"),
            Some(Fulfillment::PriorityDelivery)
        );
        assert_eq!(Fulfillment::parse("Courier"), None);
        assert_eq!(Fulfillment::Pickup.as_str(), "Pickup");
    }
}
