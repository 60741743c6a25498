//! Акт выполненных работ (completion act for services).
//!
//! No VAT column at all: the table header names works and services, the
//! totals section is a single line, and the document closes with the
//! acceptance wording and a two-column signature table.

use super::common::{format_date, format_number, non_empty};
use super::layout::{Block, Cell, DocumentTree, TableBlock, TableStyle};
use super::party::party_spans;
use super::schema::{CompletionActRequest, DocumentKind, LineItem};
use super::template::DocumentTemplate;
use super::totals::Totals;
use super::words::amount_in_words;

const ACCEPTANCE_TEXT: &str = "Вышеперечисленные работы (услуги) выполнены полностью и в срок. \
Заказчик претензий по объёму, качеству и срокам оказания услуг не имеет.";

impl DocumentTemplate for CompletionActRequest {
    fn kind(&self) -> DocumentKind {
        DocumentKind::CompletionAct
    }

    fn items(&self) -> &[LineItem] {
        &self.items
    }

    fn header(&self, number: &str, tree: &mut DocumentTree) {
        tree.heading(format!("АКТ № {}", number));
        tree.text("о приёмке выполненных работ (оказанных услуг)");
        tree.text(format!("от {}", format_date(self.act_date)));
        tree.spacer(10.0);
    }

    fn parties(&self, tree: &mut DocumentTree) {
        tree.bold("Исполнитель:");
        tree.paragraph(party_spans(&self.executor));
        tree.spacer(5.0);
        tree.bold("Заказчик:");
        tree.paragraph(party_spans(&self.customer));
        tree.spacer(5.0);

        if let Some(number) = non_empty(&self.contract_number) {
            let date = self.contract_date.map(format_date).unwrap_or_default();
            tree.labeled("Основание: ", format!("Договор № {} от {}", number, date));
        }
        if let (Some(start), Some(end)) = (self.period_start, self.period_end) {
            tree.labeled(
                "Период: ",
                format!("с {} по {}", format_date(start), format_date(end)),
            );
        }
        tree.spacer(8.0);
    }

    fn items_table(&self, tree: &mut DocumentTree) {
        let header = vec![
            "№".to_string(),
            "Наименование работ/услуг".to_string(),
            "Ед.".to_string(),
            "Кол-во".to_string(),
            "Цена".to_string(),
            "Сумма".to_string(),
        ];

        let rows = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                vec![
                    Cell::plain((index + 1).to_string()),
                    Cell::plain(item.display_name()),
                    Cell::plain(&item.unit),
                    Cell::plain(format_number(item.quantity)),
                    Cell::plain(format_number(item.price)),
                    Cell::plain(format_number(item.total())),
                ]
            })
            .collect();

        tree.push(Block::Table(TableBlock {
            header: Some(header),
            rows,
            style: TableStyle::Grid { font_size_pt: 9.0 },
        }));
        tree.spacer(5.0);
    }

    fn totals_section(&self, totals: &Totals, tree: &mut DocumentTree) {
        tree.bold(format!(
            "Итого оказано услуг (выполнено работ) на сумму: {} руб.",
            format_number(totals.total)
        ));
        tree.text(amount_in_words(totals.total));
    }

    fn extra_sections(&self, tree: &mut DocumentTree) {
        tree.spacer(10.0);
        tree.text(ACCEPTANCE_TEXT);
        if let Some(notes) = non_empty(&self.notes) {
            tree.spacer(5.0);
            tree.text(format!("Примечание: {}", notes));
        }
    }

    fn signatures(&self, tree: &mut DocumentTree) {
        tree.spacer(15.0);
        tree.push(Block::Table(TableBlock {
            header: None,
            rows: vec![
                vec![Cell::bold("ИСПОЛНИТЕЛЬ:"), Cell::bold("ЗАКАЗЧИК:")],
                vec![
                    Cell::plain(format!(
                        "__________________ {}",
                        self.executor.director.as_deref().unwrap_or("")
                    )),
                    Cell::plain(format!(
                        "__________________ {}",
                        self.customer.director.as_deref().unwrap_or("")
                    )),
                ],
                vec![Cell::plain("М.П."), Cell::plain("М.П.")],
            ],
            style: TableStyle::Borderless,
        }));
    }
}
