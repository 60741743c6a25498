use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The closed set of document templates the service can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Счёт на оплату
    Invoice,
    /// Товарная накладная
    Waybill,
    /// Акт выполненных работ
    CompletionAct,
}

impl DocumentKind {
    /// Prefix of generated document numbers.
    pub fn number_prefix(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "СЧ",
            DocumentKind::Waybill => "ТН",
            DocumentKind::CompletionAct => "АКТ",
        }
    }

    /// Stem of stored PDF filenames.
    pub fn file_stem(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoice",
            DocumentKind::Waybill => "waybill",
            DocumentKind::CompletionAct => "act",
        }
    }

    /// Russian document name, lowercase, as used in prompts and messages.
    pub fn russian_name(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "счёт на оплату",
            DocumentKind::Waybill => "товарная накладная",
            DocumentKind::CompletionAct => "акт выполненных работ",
        }
    }
}

/// Реквизиты контрагента. Only the name is mandatory; every other field is
/// skipped in the rendered document when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PartyInfo {
    /// Наименование организации
    pub name: String,
    /// ИНН
    #[serde(default)]
    pub inn: Option<String>,
    /// КПП
    #[serde(default)]
    pub kpp: Option<String>,
    /// ОГРН
    #[serde(default)]
    pub ogrn: Option<String>,
    /// Юридический адрес
    #[serde(default)]
    pub address: Option<String>,
    /// Наименование банка
    #[serde(default)]
    pub bank_name: Option<String>,
    /// БИК банка
    #[serde(default)]
    pub bank_bik: Option<String>,
    /// Расчётный счёт
    #[serde(default)]
    pub bank_account: Option<String>,
    /// Корреспондентский счёт
    #[serde(default)]
    pub corr_account: Option<String>,
    /// Телефон
    #[serde(default)]
    pub phone: Option<String>,
    /// Электронная почта
    #[serde(default)]
    pub email: Option<String>,
    /// ФИО руководителя
    #[serde(default)]
    pub director: Option<String>,
    /// ФИО главного бухгалтера
    #[serde(default)]
    pub accountant: Option<String>,
}

/// Одна позиция документа. Prices are VAT-inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LineItem {
    /// Наименование товара или услуги
    pub name: String,
    /// Дополнительное описание
    #[serde(default)]
    pub description: Option<String>,
    /// Единица измерения
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Количество
    pub quantity: f64,
    /// Цена за единицу, включая НДС
    pub price: f64,
    /// Ставка НДС в процентах; отсутствие означает «без НДС»
    #[serde(default)]
    pub vat_rate: Option<f64>,
}

fn default_unit() -> String {
    "шт.".to_string()
}

impl LineItem {
    /// Name shown in the items table, with the description in parentheses
    /// when one was supplied.
    pub fn display_name(&self) -> String {
        match self.description.as_deref().filter(|d| !d.is_empty()) {
            Some(description) => format!("{} ({})", self.name, description),
            None => self.name.clone(),
        }
    }

    /// Gross line total.
    pub fn total(&self) -> f64 {
        self.quantity * self.price
    }

    /// VAT share extracted out of the VAT-inclusive total. Zero for items
    /// without a positive VAT rate.
    pub fn vat_amount(&self) -> f64 {
        match self.vat_rate {
            Some(rate) if rate > 0.0 => self.total() * rate / (100.0 + rate),
            _ => 0.0,
        }
    }
}

/// Запрос на генерацию счёта на оплату.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct InvoiceRequest {
    pub seller: PartyInfo,
    pub buyer: PartyInfo,
    pub items: Vec<LineItem>,
    /// Дата счёта; по умолчанию — сегодня
    #[serde(default = "today")]
    pub invoice_date: NaiveDate,
    /// Срок оплаты
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Примечание внизу документа
    #[serde(default)]
    pub notes: Option<String>,
    /// Показывать колонку НДС в таблице позиций
    #[serde(default = "default_true")]
    pub include_vat: bool,
    /// Идентификатор компании в основном приложении, передаётся транзитом
    #[serde(default)]
    pub company_id: Option<i64>,
}

/// Запрос на генерацию товарной накладной.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct WaybillRequest {
    pub seller: PartyInfo,
    pub buyer: PartyInfo,
    /// Грузоотправитель, если отличается от поставщика
    #[serde(default)]
    pub shipper: Option<PartyInfo>,
    /// Грузополучатель, если отличается от покупателя
    #[serde(default)]
    pub consignee: Option<PartyInfo>,
    pub items: Vec<LineItem>,
    /// Дата накладной; по умолчанию — сегодня
    #[serde(default = "today")]
    pub waybill_date: NaiveDate,
    /// Номер договора-основания
    #[serde(default)]
    pub contract_number: Option<String>,
    /// Дата договора-основания
    #[serde(default)]
    pub contract_date: Option<NaiveDate>,
    /// Сведения о транспорте
    #[serde(default)]
    pub transport_info: Option<String>,
    #[serde(default)]
    pub company_id: Option<i64>,
}

/// Запрос на генерацию акта выполненных работ.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CompletionActRequest {
    pub executor: PartyInfo,
    pub customer: PartyInfo,
    pub items: Vec<LineItem>,
    /// Дата акта; по умолчанию — сегодня
    #[serde(default = "today")]
    pub act_date: NaiveDate,
    #[serde(default)]
    pub contract_number: Option<String>,
    #[serde(default)]
    pub contract_date: Option<NaiveDate>,
    /// Начало периода оказания услуг
    #[serde(default)]
    pub period_start: Option<NaiveDate>,
    /// Конец периода оказания услуг
    #[serde(default)]
    pub period_end: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub company_id: Option<i64>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn default_true() -> bool {
    true
}

/// Результат генерации документа. Failures travel in the same envelope with
/// `success: false` and the reason in `error`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GeneratedDocument {
    pub success: bool,
    pub document_type: DocumentKind,
    pub document_number: String,
    pub file_path: String,
    pub file_url: String,
    pub total_amount: f64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GeneratedDocument {
    pub fn completed(
        kind: DocumentKind,
        number: impl Into<String>,
        file_path: impl Into<String>,
        file_url: impl Into<String>,
        total_amount: f64,
    ) -> Self {
        Self {
            success: true,
            document_type: kind,
            document_number: number.into(),
            file_path: file_path.into(),
            file_url: file_url.into(),
            total_amount,
            currency: "RUB".to_string(),
            error: None,
        }
    }

    pub fn failed(kind: DocumentKind, error: impl Into<String>) -> Self {
        Self {
            success: false,
            document_type: kind,
            document_number: String::new(),
            file_path: String::new(),
            file_url: String::new(),
            total_amount: 0.0,
            currency: "RUB".to_string(),
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_item_defaults_apply() {
        let item: LineItem =
            serde_json::from_str(r#"{"name": "Консультация", "quantity": 2, "price": 1500}"#)
                .unwrap();
        assert_eq!(item.unit, "шт.");
        assert_eq!(item.vat_rate, None);
        assert_eq!(item.total(), 3000.0);
        assert_eq!(item.vat_amount(), 0.0);
    }

    #[test]
    fn display_name_appends_the_description() {
        let mut item = LineItem {
            name: "Бумага А4".to_string(),
            description: None,
            unit: "уп.".to_string(),
            quantity: 1.0,
            price: 450.0,
            vat_rate: None,
        };
        assert_eq!(item.display_name(), "Бумага А4");
        item.description = Some("80 г/м², 500 листов".to_string());
        assert_eq!(item.display_name(), "Бумага А4 (80 г/м², 500 листов)");
        item.description = Some(String::new());
        assert_eq!(item.display_name(), "Бумага А4");
    }

    #[test]
    fn vat_is_extracted_from_inclusive_price() {
        let item = LineItem {
            name: "Товар".to_string(),
            description: None,
            unit: "шт.".to_string(),
            quantity: 2.0,
            price: 100.0,
            vat_rate: Some(20.0),
        };
        let vat = item.vat_amount();
        assert!((vat - 200.0 * 20.0 / 120.0).abs() < 1e-9);
        assert!(vat < item.total());
    }

    #[test]
    fn zero_vat_rate_counts_as_exempt() {
        let item = LineItem {
            name: "Товар".to_string(),
            description: None,
            unit: "шт.".to_string(),
            quantity: 1.0,
            price: 100.0,
            vat_rate: Some(0.0),
        };
        assert_eq!(item.vat_amount(), 0.0);
    }

    #[test]
    fn invoice_request_defaults_apply() {
        let request: InvoiceRequest = serde_json::from_str(
            r#"{
                "seller": {"name": "ООО Ромашка"},
                "buyer": {"name": "ООО Василёк"},
                "items": [{"name": "Услуга", "quantity": 1, "price": 100}]
            }"#,
        )
        .unwrap();
        assert!(request.include_vat);
        assert_eq!(request.due_date, None);
        assert_eq!(request.company_id, None);
    }

    #[test]
    fn document_kind_uses_snake_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&DocumentKind::CompletionAct).unwrap(),
            "\"completion_act\""
        );
        let kind: DocumentKind = serde_json::from_str("\"waybill\"").unwrap();
        assert_eq!(kind, DocumentKind::Waybill);
    }

    #[test]
    fn failed_response_keeps_currency() {
        let response = GeneratedDocument::failed(DocumentKind::Invoice, "нет позиций");
        assert!(!response.success);
        assert_eq!(response.currency, "RUB");
        assert_eq!(response.error.as_deref(), Some("нет позиций"));
        assert!(response.document_number.is_empty());
    }
}
