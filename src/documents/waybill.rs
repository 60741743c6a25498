//! Товарная накладная (goods waybill).
//!
//! Denser than the invoice: tighter margins, a smaller table font, one-line
//! party rows instead of full requisites blocks. Shipper and consignee lines
//! appear only when they differ from seller and buyer, and the VAT column is
//! always present.

use super::common::{format_date, format_number, non_empty, vat_label};
use super::layout::{Block, Cell, DocumentTree, TableBlock, TableStyle};
use super::schema::{DocumentKind, LineItem, WaybillRequest};
use super::template::DocumentTemplate;
use super::totals::Totals;
use super::words::amount_in_words;

impl DocumentTemplate for WaybillRequest {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Waybill
    }

    fn items(&self) -> &[LineItem] {
        &self.items
    }

    fn margin_mm(&self) -> f32 {
        15.0
    }

    fn header(&self, number: &str, tree: &mut DocumentTree) {
        tree.heading(format!("ТОВАРНАЯ НАКЛАДНАЯ № {}", number));
        tree.text(format!("от {}", format_date(self.waybill_date)));
        tree.spacer(8.0);
    }

    fn parties(&self, tree: &mut DocumentTree) {
        tree.labeled("Поставщик: ", &self.seller.name);
        tree.labeled("Покупатель: ", &self.buyer.name);

        if let Some(shipper) = &self.shipper {
            if shipper.name != self.seller.name {
                tree.labeled("Грузоотправитель: ", &shipper.name);
            }
        }
        if let Some(consignee) = &self.consignee {
            if consignee.name != self.buyer.name {
                tree.labeled("Грузополучатель: ", &consignee.name);
            }
        }

        if let Some(number) = non_empty(&self.contract_number) {
            let date = self.contract_date.map(format_date).unwrap_or_default();
            tree.labeled("Основание: ", format!("Договор № {} от {}", number, date));
        }
        if let Some(transport) = non_empty(&self.transport_info) {
            tree.labeled("Транспорт: ", transport);
        }
        tree.spacer(8.0);
    }

    fn items_table(&self, tree: &mut DocumentTree) {
        let header = vec![
            "№".to_string(),
            "Наименование".to_string(),
            "Ед.".to_string(),
            "Кол-во".to_string(),
            "Цена".to_string(),
            "НДС".to_string(),
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
                    Cell::plain(vat_label(item)),
                    Cell::plain(format_number(item.total())),
                ]
            })
            .collect();

        tree.push(Block::Table(TableBlock {
            header: Some(header),
            rows,
            style: TableStyle::Grid { font_size_pt: 8.0 },
        }));
        tree.spacer(5.0);
    }

    fn totals_section(&self, totals: &Totals, tree: &mut DocumentTree) {
        tree.bold(format!(
            "Всего отпущено {} наименований на сумму {} руб.",
            self.items.len(),
            format_number(totals.total)
        ));
        tree.text(amount_in_words(totals.total));
    }

    fn signatures(&self, tree: &mut DocumentTree) {
        tree.spacer(10.0);
        tree.bold("Отпуск разрешил:");
        tree.text(format!(
            "Директор __________________ {}",
            self.seller.director.as_deref().unwrap_or("")
        ));
        tree.spacer(8.0);
        tree.bold("Груз принял:");
        tree.text("Представитель __________________");
    }
}
