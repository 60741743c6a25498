use chrono::Local;
use uuid::Uuid;

use super::schema::DocumentKind;

/// Generate a document number: `<PREFIX>-<YYYYMMDD>-<HHMMSS>-<4 hex chars>`,
/// e.g. `СЧ-20260824-153012-a3f2`. The timestamp keeps numbers legible and
/// roughly sortable; the random tail keeps same-second generations distinct
/// without any shared state.
pub fn document_number(kind: DocumentKind) -> String {
    let now = Local::now();
    let tail = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        kind.number_prefix(),
        now.format("%Y%m%d-%H%M%S"),
        &tail[..4]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use std::collections::HashSet;

    #[test]
    fn number_carries_the_kind_prefix() {
        assert!(document_number(DocumentKind::Invoice).starts_with("СЧ-"));
        assert!(document_number(DocumentKind::Waybill).starts_with("ТН-"));
        assert!(document_number(DocumentKind::CompletionAct).starts_with("АКТ-"));
    }

    #[test]
    fn number_matches_the_published_shape() {
        let pattern = Regex::new(r"^СЧ-\d{8}-\d{6}-[0-9a-f]{4}$").unwrap();
        let number = document_number(DocumentKind::Invoice);
        assert!(pattern.is_match(&number), "unexpected number: {}", number);
    }

    #[test]
    fn same_second_generations_stay_distinct() {
        let numbers: HashSet<String> = (0..64)
            .map(|_| document_number(DocumentKind::Waybill))
            .collect();
        assert_eq!(numbers.len(), 64);
    }
}
