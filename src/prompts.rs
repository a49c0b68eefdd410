//! The naming-convention instruction sent to the vision model.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the convention (new document
//!    type codes, a different status default) requires editing exactly one
//!    place.
//!
//! 2. **Testability** — unit tests can inspect the prompt directly without
//!    spinning up a real model.
//!
//! Callers can override it via [`crate::config::RenameConfig::prompt`];
//! the constant here is used only when no override is provided.

/// Default instruction asking the model to name the document according to
/// the company convention.
///
/// The model sees this text together with the rendered first page and must
/// answer with nothing but the filename.
pub const NAMING_PROMPT: &str = r#"Name this PDF document according to the COMPANY FILING CONVENTION.

1. STRUCTURE: YY.MM.DD_TYPE_Number_Content_Status.pdf
2. RULES:
   - YY.MM.DD: two-digit year, month, day of the document date (example: 25.12.31).
   - TYPE: the document type as an uppercase abbreviation (DEC, MEMO, LTR, NOT, PER, CTR, MIN, RPT, ...).
   - Number: the reference number printed on the document (example: 125-UBND; replace any / with -).
   - Content: a short ASCII summary of the subject, words joined with underscores '_'.
   - Status: default 'Signed'.

Reply with the filename only."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_convention_template() {
        assert!(NAMING_PROMPT.contains("YY.MM.DD_TYPE_Number_Content_Status.pdf"));
    }

    #[test]
    fn prompt_asks_for_filename_only() {
        assert!(NAMING_PROMPT.contains("filename only"));
    }
}
