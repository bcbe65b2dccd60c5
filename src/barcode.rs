// src/barcode.rs
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Separator between items in the serialized `barcodes` field.
pub const ITEM_SEPARATOR: &str = " | ";
/// Separator between a code and its quantity.
pub const QUANTITY_SEPARATOR: char = '×';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BarcodeError {
    #[error("no barcode at position {index} (list has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("malformed barcode entry: {0:?}")]
    Malformed(String),
}

pub fn normalize(raw: &str) -> String {
    // Scanners in keyboard-wedge mode append CR/LF/TAB and sometimes a BOM.
    let s = raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}');
    s.chars().filter(|c| !c.is_control()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeItem {
    pub barcode: String,
    pub quantity: u32,
}

/// A row handed to the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeRow {
    pub index: usize,
    pub barcode: String,
    pub quantity: u32,
}

/// Scanned items in first-scan order, one entry per distinct code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarcodeList {
    items: Vec<BarcodeItem>,
}

impl BarcodeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one unit of `code`. Returns `false` when the code was blank or
    /// contains the item separator, which would make the wire field unparseable.
    pub fn add_code(&mut self, code: &str) -> bool {
        let code = normalize(code);
        if code.is_empty() || code.contains(ITEM_SEPARATOR) {
            return false;
        }
        match self.items.iter_mut().find(|item| item.barcode == code) {
            Some(item) => item.quantity += 1,
            None => self.items.push(BarcodeItem {
                barcode: code,
                quantity: 1,
            }),
        }
        true
    }

    /// Adjusts the quantity at `index`; anything that falls below one is removed.
    pub fn change_quantity(&mut self, index: usize, delta: i64) -> Result<(), BarcodeError> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(BarcodeError::IndexOutOfRange { index, len })?;
        let next = i64::from(item.quantity) + delta;
        if next < 1 {
            self.items.remove(index);
        } else {
            item.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        }
        Ok(())
    }

    pub fn remove_code(&mut self, index: usize) -> Result<BarcodeItem, BarcodeError> {
        if index >= self.items.len() {
            return Err(BarcodeError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[BarcodeItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn rows(&self) -> Vec<BarcodeRow> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| BarcodeRow {
                index,
                barcode: item.barcode.clone(),
                quantity: item.quantity,
            })
            .collect()
    }

    /// Wire format: `CODE×QTY` joined by `" | "`, in list order.
    pub fn serialize(&self) -> String {
        self.items
            .iter()
            .map(|item| format!("{}{}{}", item.barcode, QUANTITY_SEPARATOR, item.quantity))
            .collect::<Vec<_>>()
            .join(ITEM_SEPARATOR)
    }

    /// Inverse of [`BarcodeList::serialize`].
    pub fn parse(serialized: &str) -> Result<Self, BarcodeError> {
        let mut list = Self::new();
        if serialized.trim().is_empty() {
            return Ok(list);
        }
        for segment in serialized.split(ITEM_SEPARATOR) {
            let (code, quantity) = segment
                .rsplit_once(QUANTITY_SEPARATOR)
                .ok_or_else(|| BarcodeError::Malformed(segment.to_string()))?;
            let code = normalize(code);
            let quantity: u32 = quantity
                .trim()
                .parse()
                .map_err(|_| BarcodeError::Malformed(segment.to_string()))?;
            if code.is_empty() || quantity == 0 {
                return Err(BarcodeError::Malformed(segment.to_string()));
            }
            match list.items.iter_mut().find(|item| item.barcode == code) {
                Some(item) => item.quantity += quantity,
                None => list.items.push(BarcodeItem {
                    barcode: code,
                    quantity,
                }),
            }
        }
        Ok(list)
    }
}

/// Drops a repeat of the same code arriving too soon after the previous scan.
#[derive(Debug, Clone)]
pub struct ScanDebouncer {
    window: Duration,
    last: Option<(DateTime<Utc>, String)>,
}

impl ScanDebouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Returns `true` when the scan should be recorded.
    pub fn accept(&mut self, code: &str, now: DateTime<Utc>) -> bool {
        if self.window <= Duration::zero() {
            return true;
        }
        if let Some((last_time, last_code)) = &self.last
            && now.signed_duration_since(*last_time) < self.window
            && last_code == code
        {
            return false;
        }
        self.last = Some((now, code.to_string()));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_scans_aggregate_into_quantity() {
        let mut list = BarcodeList::new();
        list.add_code("ABC123");
        list.add_code("ABC123");
        assert_eq!(
            list.items(),
            &[BarcodeItem {
                barcode: "ABC123".into(),
                quantity: 2
            }]
        );
        assert_eq!(list.serialize(), "ABC123×2");
    }

    #[test]
    fn decrement_to_zero_removes_item() {
        let mut list = BarcodeList::new();
        list.add_code("ABC123");
        list.add_code("XYZ999");
        list.change_quantity(0, -1).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.items()[0].barcode, "XYZ999");
        assert_eq!(list.items()[0].quantity, 1);
    }

    #[test]
    fn subtracting_full_quantity_always_removes() {
        let mut list = BarcodeList::new();
        for _ in 0..5 {
            list.add_code("A");
        }
        list.add_code("B");
        let qty = i64::from(list.items()[0].quantity);
        list.change_quantity(0, -qty).unwrap();
        assert_eq!(list.serialize(), "B×1");

        list.change_quantity(0, -40).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn counts_match_number_of_adds_and_order_is_first_seen() {
        let mut list = BarcodeList::new();
        for code in ["b", "a", "b", "c", "a", "b"] {
            list.add_code(code);
        }
        assert_eq!(list.serialize(), "b×3 | a×2 | c×1");
        assert_eq!(list.total_quantity(), 6);
    }

    #[test]
    fn blank_and_padded_input() {
        let mut list = BarcodeList::new();
        assert!(!list.add_code("   "));
        assert!(!list.add_code("\r\n"));
        assert!(list.add_code("\u{FEFF} 12345\r\n"));
        assert!(list.add_code("12345"));
        assert_eq!(list.serialize(), "12345×2");
    }

    #[test]
    fn codes_are_case_sensitive() {
        let mut list = BarcodeList::new();
        list.add_code("abc");
        list.add_code("ABC");
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn increment_and_remove_by_index() {
        let mut list = BarcodeList::new();
        list.add_code("A");
        list.add_code("B");
        list.change_quantity(1, 2).unwrap();
        assert_eq!(list.serialize(), "A×1 | B×3");

        let removed = list.remove_code(0).unwrap();
        assert_eq!(removed.barcode, "A");
        assert_eq!(list.serialize(), "B×3");
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut list = BarcodeList::new();
        list.add_code("A");
        assert_eq!(
            list.change_quantity(3, 1),
            Err(BarcodeError::IndexOutOfRange { index: 3, len: 1 })
        );
        assert!(list.remove_code(1).is_err());
        assert_eq!(list.serialize(), "A×1");
    }

    #[test]
    fn empty_list_serializes_to_empty_string() {
        assert_eq!(BarcodeList::new().serialize(), "");
        assert!(BarcodeList::parse("").unwrap().is_empty());
    }

    #[test]
    fn parse_reproduces_serialized_list() {
        let mut list = BarcodeList::new();
        for code in ["4800016644283", "FLW-ROSE-12", "4800016644283"] {
            list.add_code(code);
        }
        let parsed = BarcodeList::parse(&list.serialize()).unwrap();
        assert_eq!(parsed, list);
    }

    #[test]
    fn codes_containing_the_item_separator_are_refused() {
        let mut list = BarcodeList::new();
        assert!(!list.add_code("ROSE | RED"));
        assert!(list.add_code("ROSE|RED"));
        assert!(list.add_code("| LILY"));
        assert!(list.add_code("A×1"));
        let parsed = BarcodeList::parse(&list.serialize()).unwrap();
        assert_eq!(parsed, list);
        assert_eq!(parsed.len(), 3);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            BarcodeList::parse("ABC"),
            Err(BarcodeError::Malformed(_))
        ));
        assert!(BarcodeList::parse("ABC×0").is_err());
        assert!(BarcodeList::parse("×2").is_err());
        assert!(BarcodeList::parse("ABC×two").is_err());
    }

    #[test]
    fn rows_carry_positions() {
        let mut list = BarcodeList::new();
        list.add_code("A");
        list.add_code("B");
        let rows = list.rows();
        assert_eq!(rows[1].index, 1);
        assert_eq!(rows[1].barcode, "B");
        assert_eq!(rows[1].quantity, 1);
    }

    #[test]
    fn debouncer_drops_fast_repeats_of_same_code() {
        let mut debouncer = ScanDebouncer::new(Duration::milliseconds(1500));
        let t0 = Utc::now();
        assert!(debouncer.accept("A", t0));
        assert!(!debouncer.accept("A", t0 + Duration::milliseconds(300)));
        assert!(debouncer.accept("B", t0 + Duration::milliseconds(400)));
        assert!(debouncer.accept("A", t0 + Duration::milliseconds(500)));
        assert!(debouncer.accept("A", t0 + Duration::milliseconds(2100)));
    }

    #[test]
    fn zero_window_disables_debounce() {
        let mut debouncer = ScanDebouncer::new(Duration::zero());
        let t0 = Utc::now();
        assert!(debouncer.accept("A", t0));
        assert!(debouncer.accept("A", t0));
    }
}
