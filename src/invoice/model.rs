use chrono::{Local, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::validation::{validate_non_negative, validate_quantity, ValidationErrors, Validator};

/// Fixed VAT rate applied to the subtotal (10 %).
pub const VAT_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// BHD amounts carry three decimals (fils).
pub const MONEY_SCALE: u32 = 3;

/// Round a monetary amount to [`MONEY_SCALE`] decimals, halves away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct LineItem {
    pub id: Uuid,
    pub description: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl LineItem {
    /// A fresh row as the "add item" button creates it.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            description: String::new(),
            unit_price: Decimal::ZERO,
            quantity: 1,
        }
    }

    /// `None` when the product does not fit a `Decimal`.
    pub fn checked_total_price(&self) -> Option<Decimal> {
        self.unit_price
            .checked_mul(Decimal::from(self.quantity))
            .map(round_money)
    }

    /// Saturates at `Decimal::MAX`. Sessions refuse edits that would get there.
    pub fn total_price(&self) -> Decimal {
        self.checked_total_price().unwrap_or(Decimal::MAX)
    }
}

impl Default for LineItem {
    fn default() -> Self {
        Self::new()
    }
}

/// A line item as shown to the user, with its display number and total.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct LineItemView {
    /// 1-based position in the list
    pub no: usize,
    pub id: Uuid,
    pub description: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub total_price: Decimal,
}

impl LineItemView {
    pub fn new(no: usize, item: &LineItem) -> Self {
        Self {
            no,
            id: item.id,
            description: item.description.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
            total_price: item.total_price(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, ToSchema)]
pub struct Totals {
    pub subtotal: Decimal,
    pub vat_amount: Decimal,
    pub grand_total: Decimal,
}

impl Totals {
    /// `None` if any line total, the subtotal or the grand total overflows.
    pub fn checked_from_items(items: &[LineItem]) -> Option<Self> {
        let mut subtotal = Decimal::ZERO;
        for item in items {
            subtotal = subtotal.checked_add(item.checked_total_price()?)?;
        }
        let subtotal = round_money(subtotal);
        let vat_amount = round_money(subtotal.checked_mul(VAT_RATE)?);
        Some(Self {
            subtotal,
            vat_amount,
            grand_total: subtotal.checked_add(vat_amount)?,
        })
    }

    /// Saturates at `Decimal::MAX` like [`LineItem::total_price`].
    pub fn from_items(items: &[LineItem]) -> Self {
        Self::checked_from_items(items).unwrap_or(Self {
            subtotal: Decimal::MAX,
            vat_amount: Decimal::MAX,
            grand_total: Decimal::MAX,
        })
    }
}

/// Customer and invoice details filled in on the form.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct HeaderFields {
    pub to_company: String,
    pub customer_address: String,
    pub customer_tel: String,
    pub attn_person: String,
    pub customer_email: String,
    pub customer_po: String,
    pub invoice_date: NaiveDate,
    pub invoice_number: String,
    pub customer_vat_no: String,
    pub payment_terms: String,
}

impl HeaderFields {
    /// Pre-filled form values for an invoice dated `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            to_company: "ABC Company W.L.L.".to_string(),
            customer_address: "Building 123, Road 456, Block 789, Manama, Bahrain".to_string(),
            customer_tel: "+973 17XXXXXX".to_string(),
            attn_person: "Mr. John Doe".to_string(),
            customer_email: "john.doe@abccompany.com".to_string(),
            customer_po: "PO-12345".to_string(),
            invoice_date: date,
            invoice_number: format!("SSS-{}-001", date.format("%y%m%d")),
            customer_vat_no: "VAT123456789".to_string(),
            payment_terms: "30 days from invoice date".to_string(),
        }
    }

    pub fn apply(&mut self, patch: &UpdateHeaderRequest) {
        let text_fields = [
            (&mut self.to_company, &patch.to_company),
            (&mut self.customer_address, &patch.customer_address),
            (&mut self.customer_tel, &patch.customer_tel),
            (&mut self.attn_person, &patch.attn_person),
            (&mut self.customer_email, &patch.customer_email),
            (&mut self.customer_po, &patch.customer_po),
            (&mut self.invoice_number, &patch.invoice_number),
            (&mut self.customer_vat_no, &patch.customer_vat_no),
            (&mut self.payment_terms, &patch.payment_terms),
        ];
        for (field, value) in text_fields {
            if let Some(value) = value {
                *field = value.clone();
            }
        }
        if let Some(date) = patch.invoice_date {
            self.invoice_date = date;
        }
    }
}

impl Default for HeaderFields {
    fn default() -> Self {
        Self::for_date(Local::now().date_naive())
    }
}

/// Partial update of the header form. Absent fields are left untouched.
#[derive(Deserialize, Debug, Default, Clone, ToSchema)]
pub struct UpdateHeaderRequest {
    pub to_company: Option<String>,
    pub customer_address: Option<String>,
    pub customer_tel: Option<String>,
    pub attn_person: Option<String>,
    pub customer_email: Option<String>,
    pub customer_po: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub invoice_number: Option<String>,
    pub customer_vat_no: Option<String>,
    pub payment_terms: Option<String>,
}

/// Partial update of one line item. Absent fields are left untouched.
#[derive(Deserialize, Debug, Default, Clone, ToSchema)]
pub struct UpdateLineItemRequest {
    pub description: Option<String>,
    pub unit_price: Option<Decimal>,
    /// Signed so out-of-range input reaches validation instead of failing to parse
    pub quantity: Option<i64>,
}

impl Validator for UpdateLineItemRequest {
    fn validate(&self) -> Result<(), String> {
        let mut errors = ValidationErrors::new();

        if let Some(unit_price) = self.unit_price {
            validate_non_negative(unit_price, "unit_price", "Unit price", &mut errors);
        }
        if let Some(quantity) = self.quantity {
            validate_quantity(quantity, "quantity", &mut errors);
        }

        errors.into_result()
    }
}

/// Frozen snapshot of a submitted invoice; the renderer's only input.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct InvoiceRecord {
    pub header: HeaderFields,
    pub items: Vec<LineItem>,
    pub totals: Totals,
}

impl InvoiceRecord {
    /// Snapshot `items`, computing totals from them.
    pub fn new(header: HeaderFields, items: Vec<LineItem>) -> Self {
        let totals = Totals::from_items(&items);
        Self {
            header,
            items,
            totals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(description: &str, unit_price: Decimal, quantity: u32) -> LineItem {
        LineItem {
            description: description.to_string(),
            unit_price,
            quantity,
            ..LineItem::new()
        }
    }

    #[test]
    fn test_consulting_example() {
        let items = vec![item("Consulting", Decimal::new(100_000, 3), 2)];
        assert_eq!(items[0].total_price(), Decimal::new(200_000, 3));

        let totals = Totals::from_items(&items);
        assert_eq!(totals.subtotal, Decimal::new(200_000, 3));
        assert_eq!(totals.vat_amount, Decimal::new(20_000, 3));
        assert_eq!(totals.grand_total, Decimal::new(220_000, 3));
    }

    #[test]
    fn test_subtotal_is_sum_of_line_totals() {
        let items = vec![
            item("Cable", Decimal::new(1_250, 3), 3),
            item("Switch", Decimal::new(45_500, 3), 1),
            item("Labour", Decimal::new(12_345, 3), 7),
        ];
        let expected: Decimal = items.iter().map(LineItem::total_price).sum();
        let totals = Totals::from_items(&items);
        assert_eq!(totals.subtotal, expected);
        assert_eq!(totals.subtotal, Decimal::new(135_665, 3));
        assert_eq!(totals.grand_total, totals.subtotal + totals.vat_amount);
    }

    #[test]
    fn test_vat_rounds_to_three_decimals() {
        // 0.005 * 0.10 = 0.0005 rounds up to 0.001
        let totals = Totals::from_items(&[item("Tiny", Decimal::new(5, 3), 1)]);
        assert_eq!(totals.vat_amount, Decimal::new(1, 3));
        assert_eq!(totals.grand_total, Decimal::new(6, 3));

        // 1.234 * 0.10 = 0.1234 rounds down to 0.123
        let totals = Totals::from_items(&[item("Small", Decimal::new(1_234, 3), 1)]);
        assert_eq!(totals.vat_amount, Decimal::new(123, 3));
    }

    #[test]
    fn test_overflowing_amounts_are_detected() {
        let huge = item("Huge", Decimal::from_parts(0, 0, 0x2000_0000, false, 0), 10);
        assert_eq!(huge.checked_total_price(), None);
        assert_eq!(huge.total_price(), Decimal::MAX);
        assert_eq!(Totals::checked_from_items(&[huge.clone()]), None);

        // Each line fits, the sum does not
        let half = item("Half", Decimal::MAX / Decimal::TWO, 1);
        assert!(half.checked_total_price().is_some());
        let items = vec![half.clone(), half.clone(), half];
        assert_eq!(Totals::checked_from_items(&items), None);
        assert_eq!(Totals::from_items(&items).grand_total, Decimal::MAX);
    }

    #[test]
    fn test_empty_items_total_zero() {
        let totals = Totals::from_items(&[]);
        assert!(totals.subtotal.is_zero());
        assert!(totals.vat_amount.is_zero());
        assert!(totals.grand_total.is_zero());
    }

    #[test]
    fn test_default_header_uses_date_in_invoice_number() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let header = HeaderFields::for_date(date);
        assert_eq!(header.invoice_number, "SSS-250307-001");
        assert_eq!(header.invoice_date, date);
        assert_eq!(header.payment_terms, "30 days from invoice date");
    }

    #[test]
    fn test_header_patch_only_touches_given_fields() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let mut header = HeaderFields::for_date(date);
        let patch = UpdateHeaderRequest {
            to_company: Some("Gulf Trading".to_string()),
            customer_email: Some(String::new()),
            ..Default::default()
        };
        header.apply(&patch);
        assert_eq!(header.to_company, "Gulf Trading");
        assert_eq!(header.customer_email, "");
        assert_eq!(header.customer_po, "PO-12345");
        assert_eq!(header.invoice_date, date);
    }

    #[test]
    fn test_line_item_patch_validation() {
        let ok = UpdateLineItemRequest {
            unit_price: Some(Decimal::ZERO),
            quantity: Some(1),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let bad = UpdateLineItemRequest {
            unit_price: Some(Decimal::new(-5, 0)),
            quantity: Some(0),
            ..Default::default()
        };
        let message = bad.validate().unwrap_err();
        assert!(message.contains("unit_price"));
        assert!(message.contains("quantity"));
    }

    #[test]
    fn test_record_deserializes_decimal_numbers() {
        let json = r#"{
            "header": {
                "to_company": "ABC",
                "customer_address": "Manama",
                "customer_tel": "",
                "attn_person": "",
                "customer_email": "",
                "customer_po": "",
                "invoice_date": "2025-02-01",
                "invoice_number": "SSS-250201-001",
                "customer_vat_no": "",
                "payment_terms": "Cash"
            },
            "items": [
                {"id": "4f5b2c4e-2f5a-4a2b-9c51-1d8a0c2e7b11", "description": "Consulting", "unit_price": 100.0, "quantity": 2}
            ],
            "totals": {"subtotal": 200.0, "vat_amount": 20.0, "grand_total": 220.0}
        }"#;

        let record: InvoiceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].total_price(), Decimal::new(200, 0));
        assert_eq!(record.totals, Totals::from_items(&record.items));
    }
}
