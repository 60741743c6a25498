use super::common::non_empty;
use super::layout::Span;
use super::schema::PartyInfo;

/// Render the requisites block shown for a counterparty. Line order is
/// fixed: name, tax ids, address, then banking details; absent fields are
/// skipped entirely rather than rendered blank.
pub fn format_party(party: &PartyInfo) -> Vec<String> {
    let mut lines = vec![party.name.clone()];

    if let Some(inn) = non_empty(&party.inn) {
        let mut line = format!("ИНН {}", inn);
        if let Some(kpp) = non_empty(&party.kpp) {
            line.push_str(&format!(", КПП {}", kpp));
        }
        lines.push(line);
    }

    if let Some(address) = non_empty(&party.address) {
        lines.push(format!("Адрес: {}", address));
    }

    if let Some(bank) = non_empty(&party.bank_name) {
        let bik = non_empty(&party.bank_bik).unwrap_or("-");
        lines.push(format!("Банк: {}, БИК {}", bank, bik));
        let account = non_empty(&party.bank_account).unwrap_or("-");
        lines.push(format!("Р/с: {}", account));
    }

    lines
}

/// The same block as paragraph spans, lines separated by forced breaks.
pub fn party_spans(party: &PartyInfo) -> Vec<Span> {
    let mut spans = Vec::new();
    for (index, line) in format_party(party).into_iter().enumerate() {
        if index > 0 {
            spans.push(Span::Linebreak);
        }
        spans.push(Span::Text(line));
    }
    spans
}
