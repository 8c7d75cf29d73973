use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::ledger::{CategoryId, LedgerId, YearMonth};

use super::{parse_timestamp, LedgerRecord, LedgerStore, RetrievalError};

/// On-disk shape of `<ledger id>.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerDocument {
    #[serde(default)]
    pub records: Vec<LedgerRecord>,
}

/// Read-only store over a directory holding one JSON document per ledger.
#[derive(Debug, Clone)]
pub struct JsonLedgerStore {
    root: PathBuf,
}

impl JsonLedgerStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ledger_path(&self, owner: LedgerId) -> PathBuf {
        self.root.join(format!("{owner}.json"))
    }

    fn load_document(&self, owner: LedgerId) -> Result<LedgerDocument, RetrievalError> {
        let path = self.ledger_path(owner);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(RetrievalError::LedgerNotFound(owner))
            }
            Err(err) => return Err(err.into()),
        };
        let document: LedgerDocument = serde_json::from_str(&data)?;
        tracing::debug!(
            path = %path.display(),
            records = document.records.len(),
            "loaded ledger document"
        );
        Ok(document)
    }
}

impl LedgerStore for JsonLedgerStore {
    fn fetch_month(
        &self,
        owner: LedgerId,
        month: YearMonth,
    ) -> Result<Vec<LedgerRecord>, RetrievalError> {
        let document = self.load_document(owner)?;
        let mut matched = Vec::new();
        for record in document.records {
            let stamp =
                parse_timestamp(&record.used_date).ok_or_else(|| RetrievalError::MalformedRecord {
                    id: record.id,
                    reason: format!("unreadable date `{}`", record.used_date),
                })?;
            if month.contains(stamp.date()) {
                matched.push(record);
            }
        }
        Ok(matched)
    }

    fn fetch_category_history(
        &self,
        owner: LedgerId,
        category: CategoryId,
    ) -> Result<Vec<LedgerRecord>, RetrievalError> {
        let document = self.load_document(owner)?;
        Ok(document
            .records
            .into_iter()
            .filter(|record| record.category_id == category)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_fixture(dir: &Path, owner: LedgerId, body: &str) {
        fs::write(dir.join(format!("{owner}.json")), body).unwrap();
    }

    #[test]
    fn missing_ledger_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = JsonLedgerStore::new(dir.path());
        let month = YearMonth::new(2024, 3).unwrap();
        assert!(matches!(
            store.fetch_month(42, month),
            Err(RetrievalError::LedgerNotFound(42))
        ));
    }

    #[test]
    fn fetch_month_filters_by_key() {
        let dir = TempDir::new().unwrap();
        write_fixture(
            dir.path(),
            1,
            r#"{ "records": [
                { "id": 1, "itemName": "A", "itemAmount": 10, "inoutFlg": false,
                  "usedDate": "2024-02-29T10:00:00", "categoryId": 1 },
                { "id": 2, "itemName": "B", "itemAmount": 20, "inoutFlg": false,
                  "usedDate": "2024-03-01", "categoryId": 1 }
            ] }"#,
        );
        let store = JsonLedgerStore::new(dir.path());
        let march = store.fetch_month(1, YearMonth::new(2024, 3).unwrap()).unwrap();
        assert_eq!(march.len(), 1);
        assert_eq!(march[0].id, 2);
    }

    #[test]
    fn corrupt_document_is_a_serde_error() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path(), 1, "{ records: ");
        let store = JsonLedgerStore::new(dir.path());
        assert!(matches!(
            store.fetch_category_history(1, 1),
            Err(RetrievalError::Serde(_))
        ));
    }
}
