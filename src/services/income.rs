//! Income service

use chrono::{Duration, Local, NaiveDate};

use crate::error::BizdeskResult;
use crate::models::{BusinessId, EntryValidationError, Income, Money};
use crate::storage::{Repository, Storage};

use super::ledger::{EntryView, LedgerRecord, LedgerService};

/// Service for income management
pub type IncomeService<'a> = LedgerService<'a, Income>;

impl LedgerRecord for Income {
    fn create(business_id: BusinessId, description: String, amount: Money, date: NaiveDate) -> Self {
        Income::new(business_id, description, amount, date)
    }

    fn repository(storage: &Storage) -> &Repository<Self> {
        &storage.incomes
    }

    fn set_description(&mut self, description: String) {
        self.description = description;
    }

    fn set_amount(&mut self, amount: Money) {
        self.amount = amount;
    }

    fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    fn touch(&mut self) {
        Income::touch(self);
    }

    fn validate(&self) -> Result<(), EntryValidationError> {
        Income::validate(self)
    }
}

/// First day of the trailing seven-day window ending today
pub fn last_seven_days_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(7)
}

impl<'a> LedgerService<'a, Income> {
    /// Incomes dated within the last seven days, newest first
    pub fn list_last_seven_days(
        &self,
        business_id: Option<BusinessId>,
    ) -> BizdeskResult<Vec<EntryView<Income>>> {
        let today = Local::now().date_naive();
        self.list(business_id, Some(last_seven_days_start(today)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Business;
    use crate::services::ledger::{CreateEntry, UpdateEntry};
    use crate::storage::tests::create_test_storage;

    fn setup() -> (tempfile::TempDir, Storage, Business) {
        let (temp_dir, storage) = create_test_storage();
        let business = Business::new("Servicell");
        storage.businesses.upsert(business.clone()).unwrap();
        (temp_dir, storage, business)
    }

    fn request(business: &Business, description: &str, date: Option<NaiveDate>) -> CreateEntry {
        CreateEntry {
            description: Some(description.into()),
            amount: Some(Money::from_cents(4500)),
            date,
            business_id: Some(business.id.to_string()),
        }
    }

    #[test]
    fn test_create_defaults_date_to_today() {
        let (_temp_dir, storage, business) = setup();
        let service = IncomeService::new(&storage);

        let view = service.create(request(&business, "Reparación", None)).unwrap();
        assert_eq!(view.entry.date, Local::now().date_naive());
        assert_eq!(view.business.name, "Servicell");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["amount"], 45);
        assert_eq!(json["business"]["name"], "Servicell");
    }

    #[test]
    fn test_create_requires_fields() {
        let (_temp_dir, storage, business) = setup();
        let service = IncomeService::new(&storage);

        let err = service
            .create(CreateEntry {
                amount: None,
                ..request(&business, "Venta", None)
            })
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .create(CreateEntry {
                business_id: Some(BusinessId::new().to_string()),
                ..request(&business, "Venta", None)
            })
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_last_seven_days_window() {
        let (_temp_dir, storage, business) = setup();
        let service = IncomeService::new(&storage);
        let today = Local::now().date_naive();

        service
            .create(request(&business, "Hoy", Some(today)))
            .unwrap();
        service
            .create(request(&business, "Límite", Some(today - Duration::days(7))))
            .unwrap();
        service
            .create(request(&business, "Antigua", Some(today - Duration::days(8))))
            .unwrap();

        let recent = service.list_last_seven_days(Some(business.id)).unwrap();
        let descriptions: Vec<&str> = recent.iter().map(|v| v.entry.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Hoy", "Límite"]);

        assert_eq!(service.list(None, None).unwrap().len(), 3);
    }

    #[test]
    fn test_update_and_delete() {
        let (_temp_dir, storage, business) = setup();
        let service = IncomeService::new(&storage);
        let created = service.create(request(&business, "Venta", None)).unwrap();
        let id = created.entry.id;

        let updated = service
            .update(
                id,
                UpdateEntry {
                    amount: Some(Money::from_cents(5000)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.entry.amount.cents(), 5000);
        assert_eq!(updated.entry.description, "Venta");

        assert!(service.delete(id, Some(1)).unwrap_err().is_conflict());
        service.delete(id, Some(2)).unwrap();
        assert!(service.get(id).unwrap_err().is_not_found());
    }
}
