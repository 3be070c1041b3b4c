//! Common regex patterns for invoice field extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Invoice identifier token: 4-41 chars, alphanumeric start.
macro_rules! id_token {
    () => {
        r"([A-Z0-9][A-Z0-9\-/]{3,40})"
    };
}

/// Label plus optional `no`/`number`/`#` suffix and separator, same line.
/// A dash only separates when preceded by whitespace, so `INV-2024` stays a value.
macro_rules! invoice_label {
    () => {
        r"\b(?:invoice|inv)\.?[ \t]*(?:no\.?|number|num|#)?[ \t]*(?:[:#]|[ \t]-)?[ \t]*"
    };
}

macro_rules! ref_label {
    () => {
        r"\b(?:reference|ref)\.?[ \t]*(?:no\.?|number|#)?[ \t]*(?:[:#]|[ \t]-)?[ \t]*"
    };
}

macro_rules! id_label {
    () => {
        r"\bid[ \t]*(?:no\.?|number|#)?[ \t]*(?:[:#]|[ \t]-)?[ \t]*"
    };
}

lazy_static! {
    // Invoice ID: label and value on one line, tried in this order
    pub static ref INVOICE_ID_SAME_LINE: Vec<Regex> = vec![
        Regex::new(concat!("(?i)", invoice_label!(), id_token!())).unwrap(),
        Regex::new(concat!("(?i)", ref_label!(), id_token!())).unwrap(),
        Regex::new(concat!("(?i)", id_label!(), id_token!())).unwrap(),
    ];

    // Invoice ID: label line followed by the value on the next line
    pub static ref INVOICE_ID_MULTI_LINE: Vec<Regex> = vec![
        Regex::new(concat!("(?i)", invoice_label!(), r"\r?\n[ \t]*", id_token!())).unwrap(),
        Regex::new(concat!("(?i)", ref_label!(), r"\r?\n[ \t]*", id_token!())).unwrap(),
        Regex::new(concat!("(?i)", id_label!(), r"\r?\n[ \t]*", id_token!())).unwrap(),
    ];

    /// Unlabeled identifier carrying its own `INV` prefix.
    pub static ref INVOICE_ID_PREFIXED: Regex = Regex::new(
        r"(?i)\b(INV[-/#]?\d[A-Z0-9\-/]{2,40})\b"
    ).unwrap();

    /// Line that introduces an invoice number in the fallback scan.
    pub static ref INVOICE_HEADER_LINE: Regex = Regex::new(
        r"(?i)invoice(\s*(number|no|#))?"
    ).unwrap();

    /// Standalone identifier line in the fallback scan.
    pub static ref ID_LINE: Regex = Regex::new(
        r"(?i)^[A-Z0-9\-/]{3,40}$"
    ).unwrap();

    /// Small integer lines (quantities, line numbers).
    pub static ref SMALL_COUNT: Regex = Regex::new(
        r"^\d{1,3}$"
    ).unwrap();

    pub static ref CURRENCY_SYMBOL: Regex = Regex::new(
        r"[$€£]"
    ).unwrap();

    // Dates, tried in this order
    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b\d{4}[-/]\d{2}[-/]\d{2}\b"
    ).unwrap();

    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b\d{1,2}[-/]\d{1,2}[-/]\d{4}\b"
    ).unwrap();

    pub static ref DATE_MONTH_NAME: Regex = Regex::new(
        r"(?i)\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\.?\s+\d{1,2},?\s*\d{4}\b"
    ).unwrap();

    // Totals
    /// First financial keyword; the summary block starts here.
    pub static ref SUMMARY_KEYWORD: Regex = Regex::new(
        r"(?i)subtotal|grand\s*total|total\s*due|amount\s*due|total|balance|summary"
    ).unwrap();

    pub static ref MONEY_TOKEN: Regex = Regex::new(
        r"[$€£]?\s*[0-9][0-9.,]*"
    ).unwrap();

    // Vendor: labeled blocks, tried in this order
    pub static ref VENDOR_LABELED_BLOCKS: Vec<Regex> = vec![
        Regex::new(r"(?is)Seller:\s*(.*?)(?:Client:|Tax|IBAN|Items|\n[ \t]*\n|$)").unwrap(),
        Regex::new(r"(?is)Vendor:\s*(.*?)(?:Client:|Tax|IBAN|Items|\n[ \t]*\n|$)").unwrap(),
        Regex::new(r"(?is)From:\s*(.*?)(?:Client:|Tax|IBAN|Items|\n[ \t]*\n|$)").unwrap(),
        Regex::new(r"(?is)Client:\s*(.*?)(?:Tax|IBAN|Items|\n[ \t]*\n|$)").unwrap(),
    ];

    pub static ref VENDOR_FROM_BLOCKS: Vec<Regex> = vec![
        Regex::new(r"(?is)\bBILL\s+FROM\b:?\s*(.*?)(?:Bill\s+To|Client:|Tax|IBAN|Items|\n[ \t]*\n|$)").unwrap(),
        Regex::new(r"(?is)\bFROM\b:?\s*(.*?)(?:Bill\s+To|Client:|Tax|IBAN|Items|\n[ \t]*\n|$)").unwrap(),
    ];

    /// Lines that are labels or amounts rather than a company name.
    pub static ref VENDOR_FORBIDDEN: Regex = Regex::new(
        r"(?i)invoice|date|total|amount|due|balance|id|ref|item|qty|net|vat|bill\s+to|bill\s+from"
    ).unwrap();

    pub static ref NUMERIC_LINE: Regex = Regex::new(
        r"^[\d\s.,:/\-]+$"
    ).unwrap();

    pub static ref ID_SHAPED: Regex = Regex::new(
        r"^[A-Z0-9-]{4,30}$"
    ).unwrap();
}
