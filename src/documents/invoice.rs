//! Счёт на оплату (payment invoice).
//!
//! Full requisites blocks for both parties, an item table whose VAT column
//! is optional, a VAT breakdown above the grand total, and a two-signature
//! block with the seal mark.

use super::common::{format_date, format_number, non_empty, vat_label};
use super::layout::{Block, Cell, DocumentTree, TableBlock, TableStyle};
use super::party::party_spans;
use super::schema::{DocumentKind, InvoiceRequest, LineItem};
use super::template::DocumentTemplate;
use super::totals::Totals;
use super::words::amount_in_words;

impl DocumentTemplate for InvoiceRequest {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Invoice
    }

    fn items(&self) -> &[LineItem] {
        &self.items
    }

    fn header(&self, number: &str, tree: &mut DocumentTree) {
        tree.heading(format!("СЧЁТ НА ОПЛАТУ № {}", number));
        tree.text(format!("от {}", format_date(self.invoice_date)));
        tree.spacer(10.0);
    }

    fn parties(&self, tree: &mut DocumentTree) {
        tree.bold("Поставщик:");
        tree.paragraph(party_spans(&self.seller));
        tree.spacer(5.0);
        tree.bold("Покупатель:");
        tree.paragraph(party_spans(&self.buyer));
        tree.spacer(10.0);
    }

    fn items_table(&self, tree: &mut DocumentTree) {
        let mut header = vec![
            "№".to_string(),
            "Наименование".to_string(),
            "Ед.".to_string(),
            "Кол-во".to_string(),
            "Цена".to_string(),
        ];
        if self.include_vat {
            header.push("НДС".to_string());
        }
        header.push("Сумма".to_string());

        let mut rows = Vec::with_capacity(self.items.len());
        for (index, item) in self.items.iter().enumerate() {
            let mut row = vec![
                Cell::plain((index + 1).to_string()),
                Cell::plain(item.display_name()),
                Cell::plain(&item.unit),
                Cell::plain(format_number(item.quantity)),
                Cell::plain(format_number(item.price)),
            ];
            if self.include_vat {
                row.push(Cell::plain(vat_label(item)));
            }
            row.push(Cell::plain(format_number(item.total())));
            rows.push(row);
        }

        tree.push(Block::Table(TableBlock {
            header: Some(header),
            rows,
            style: TableStyle::Grid { font_size_pt: 9.0 },
        }));
        tree.spacer(5.0);
    }

    fn totals_section(&self, totals: &Totals, tree: &mut DocumentTree) {
        if self.include_vat && totals.vat > 0.0 {
            tree.labeled(
                "Итого без НДС: ",
                format!("{} руб.", format_number(totals.subtotal)),
            );
            tree.labeled(
                "В т.ч. НДС: ",
                format!("{} руб.", format_number(totals.vat)),
            );
        }
        tree.labeled("ИТОГО: ", format!("{} руб.", format_number(totals.total)));
        tree.spacer(3.0);
        tree.bold(format!(
            "Всего наименований {}, на сумму {} руб.",
            self.items.len(),
            format_number(totals.total)
        ));
        tree.text(amount_in_words(totals.total));
    }

    fn extra_sections(&self, tree: &mut DocumentTree) {
        if let Some(due) = self.due_date {
            tree.spacer(5.0);
            tree.labeled("Срок оплаты: ", format_date(due));
        }
        if let Some(notes) = non_empty(&self.notes) {
            tree.spacer(5.0);
            tree.text(format!("Примечание: {}", notes));
        }
    }

    fn signatures(&self, tree: &mut DocumentTree) {
        tree.spacer(15.0);
        tree.text(format!(
            "Руководитель __________________ {}",
            self.seller.director.as_deref().unwrap_or("")
        ));
        tree.spacer(5.0);
        tree.text(format!(
            "Главный бухгалтер __________________ {}",
            self.seller.accountant.as_deref().unwrap_or("")
        ));
        tree.spacer(10.0);
        tree.text("М.П.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::layout::Span;
    use crate::documents::schema::PartyInfo;
    use crate::documents::template::assemble;
    use chrono::NaiveDate;

    fn request(include_vat: bool) -> InvoiceRequest {
        InvoiceRequest {
            seller: PartyInfo {
                name: "ООО «Ромашка»".to_string(),
                inn: Some("7701234567".to_string()),
                director: Some("Иванов И.И.".to_string()),
                ..PartyInfo::default()
            },
            buyer: PartyInfo {
                name: "ООО «Василёк»".to_string(),
                ..PartyInfo::default()
            },
            items: vec![LineItem {
                name: "Консультация".to_string(),
                description: None,
                unit: "час".to_string(),
                quantity: 2.0,
                price: 100.0,
                vat_rate: Some(20.0),
            }],
            invoice_date: NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
            due_date: None,
            notes: None,
            include_vat,
            company_id: None,
        }
    }

    fn collect_text(tree: &DocumentTree) -> String {
        let mut out = String::new();
        for block in &tree.blocks {
            match block {
                Block::Heading(text) => out.push_str(text),
                Block::Paragraph(spans) => {
                    for span in spans {
                        match span {
                            Span::Text(text) | Span::Bold(text) => out.push_str(text),
                            Span::Linebreak => out.push('\n'),
                        }
                    }
                }
                Block::Table(table) => {
                    for row in &table.rows {
                        for cell in row {
                            out.push_str(&cell.text);
                            out.push(' ');
                        }
                    }
                }
                Block::Spacer(_) => {}
            }
            out.push('\n');
        }
        out
    }

    fn first_table(tree: &DocumentTree) -> &TableBlock {
        tree.blocks
            .iter()
            .find_map(|block| match block {
                Block::Table(table) => Some(table),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn vat_column_follows_the_flag() {
        let with_vat = assemble(&request(true)).unwrap();
        let header = first_table(&with_vat.tree).header.clone().unwrap();
        assert_eq!(
            header,
            vec!["№", "Наименование", "Ед.", "Кол-во", "Цена", "НДС", "Сумма"]
        );

        let without_vat = assemble(&request(false)).unwrap();
        let header = first_table(&without_vat.tree).header.clone().unwrap();
        assert_eq!(
            header,
            vec!["№", "Наименование", "Ед.", "Кол-во", "Цена", "Сумма"]
        );
    }

    #[test]
    fn vat_breakdown_appears_only_when_shown_and_nonzero() {
        let with_vat = assemble(&request(true)).unwrap();
        let text = collect_text(&with_vat.tree);
        assert!(text.contains("Итого без НДС: 166,67 руб."));
        assert!(text.contains("В т.ч. НДС: 33,33 руб."));
        assert!(text.contains("ИТОГО: 200,00 руб."));

        let mut exempt = request(true);
        exempt.items[0].vat_rate = None;
        let assembled = assemble(&exempt).unwrap();
        let text = collect_text(&assembled.tree);
        assert!(!text.contains("Итого без НДС"));
        assert!(text.contains("ИТОГО: 200,00 руб."));
    }

    #[test]
    fn amount_in_words_follows_the_totals() {
        let assembled = assemble(&request(true)).unwrap();
        let text = collect_text(&assembled.tree);
        assert!(text.contains("Всего наименований 1, на сумму 200,00 руб."));
        assert!(text.contains("Двести рублей 00 копеек"));
    }

    #[test]
    fn header_carries_number_and_date() {
        let assembled = assemble(&request(true)).unwrap();
        let text = collect_text(&assembled.tree);
        assert!(text.contains(&format!("СЧЁТ НА ОПЛАТУ № {}", assembled.number)));
        assert!(text.contains("от 24 августа 2026 г."));
    }

    #[test]
    fn due_date_and_notes_render_when_present() {
        let mut req = request(true);
        req.due_date = NaiveDate::from_ymd_opt(2026, 9, 7);
        req.notes = Some("Оплата по реквизитам".to_string());
        let text = collect_text(&assemble(&req).unwrap().tree);
        assert!(text.contains("Срок оплаты: 7 сентября 2026 г."));
        assert!(text.contains("Примечание: Оплата по реквизитам"));

        let text = collect_text(&assemble(&request(true)).unwrap().tree);
        assert!(!text.contains("Срок оплаты"));
        assert!(!text.contains("Примечание"));
    }

    #[test]
    fn signatures_name_the_seller_officers() {
        let text = collect_text(&assemble(&request(true)).unwrap().tree);
        assert!(text.contains("Руководитель __________________ Иванов И.И."));
        assert!(text.contains("Главный бухгалтер __________________ "));
        assert!(text.contains("М.П."));
    }

    #[test]
    fn quantity_cells_are_formatted_like_money_cells() {
        let mut req = request(true);
        req.items[0].quantity = 2.5;
        let table = assemble(&req).unwrap();
        let rows = &first_table(&table.tree).rows;
        assert_eq!(rows[0][3].text, "2,50");
        assert_eq!(rows[0][4].text, "100,00");
        assert_eq!(rows[0][6].text, "250,00");
    }

    #[test]
    fn empty_items_fail_validation_before_any_layout() {
        let mut req = request(true);
        req.items.clear();
        let err = assemble(&req).unwrap_err();
        assert!(err.to_string().contains("items"));
    }
}
