//! Update execution
//!
//! Runs a sequence of mutation commands and records one affected-row count
//! per statement, in order. A failed statement stops the sequence; earlier
//! counts stay recorded, the failing statement reports none.

use crate::mutation::MutationTranslator;
use crate::schema::TableMapping;
use crate::store::StoreConnection;

use super::command::Command;
use super::config::TranslatorConfig;
use super::errors::{TranslatorError, TranslatorResult};

/// One update execution: a run of mutation statements with their counts.
pub struct UpdateExecution<'a> {
    mapping: &'a TableMapping,
    conn: &'a dyn StoreConnection,
    config: TranslatorConfig,
    counts: Vec<u64>,
}

impl<'a> UpdateExecution<'a> {
    /// Creates an update execution against one mapped table.
    pub fn new(
        mapping: &'a TableMapping,
        conn: &'a dyn StoreConnection,
        config: TranslatorConfig,
    ) -> Self {
        Self {
            mapping,
            conn,
            config,
            counts: Vec::new(),
        }
    }

    /// Executes one mutation command and records its affected count.
    pub fn execute(&mut self, command: &Command) -> TranslatorResult<u64> {
        let translator = MutationTranslator::new(self.mapping, self.config.batch_size);
        let count = match command {
            Command::Insert(source) => translator.insert(self.conn, source)?,
            Command::Update(statement) => translator.update(self.conn, statement)?,
            Command::Delete(statement) => translator.delete(self.conn, statement)?,
            Command::Select(_) | Command::Procedure(_) => {
                return Err(TranslatorError::InvalidState(
                    "read command in an update execution".into(),
                ))
            }
        };
        self.counts.push(count);
        Ok(count)
    }

    /// Returns the per-statement affected counts recorded so far.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::{Assignment, DeleteStatement, InputRow, InsertSource, UpdateStatement};
    use crate::planner::Filter;
    use crate::schema::{ColumnBinding, ColumnDef};
    use crate::store::MemStore;
    use crate::types::{TypeTag, TypedValue};

    fn mapping() -> TableMapping {
        TableMapping::new(
            "items",
            vec![
                ColumnDef::row_key("id", TypeTag::Int),
                ColumnDef::new("label", TypeTag::String, ColumnBinding::value("cf", "label")),
            ],
            vec!["id".into()],
        )
        .unwrap()
    }

    fn insert_rows(ids: &[i64]) -> Command {
        let rows = ids
            .iter()
            .map(|id| {
                let mut row = InputRow::new();
                row.insert("id".into(), TypedValue::Int(*id));
                row.insert("label".into(), TypedValue::String(format!("item{id}")));
                row
            })
            .collect();
        Command::Insert(InsertSource::Bulk(rows))
    }

    #[test]
    fn test_per_statement_counts_in_order() {
        let m = mapping();
        let store = MemStore::new();
        let mut exec = UpdateExecution::new(&m, &store, TranslatorConfig::default());

        exec.execute(&insert_rows(&[1, 2, 3])).unwrap();
        exec.execute(&Command::Update(UpdateStatement::new(
            vec![Assignment::literal("label", TypedValue::String("x".into()))],
            Some(Filter::ge("id", TypedValue::Int(2))),
        )))
        .unwrap();
        exec.execute(&Command::Delete(DeleteStatement::new(Some(Filter::eq(
            "id",
            TypedValue::Int(1),
        )))))
        .unwrap();

        assert_eq!(exec.counts(), &[3, 2, 1]);
    }

    #[test]
    fn test_read_command_rejected() {
        let m = mapping();
        let store = MemStore::new();
        let mut exec = UpdateExecution::new(&m, &store, TranslatorConfig::default());
        let command = Command::Select(crate::exec::SelectCommand::new(vec![], None));
        assert!(matches!(
            exec.execute(&command),
            Err(TranslatorError::InvalidState(_))
        ));
        assert!(exec.counts().is_empty());
    }

    #[test]
    fn test_failed_statement_records_no_count() {
        let m = mapping();
        let store = MemStore::new();
        let mut exec = UpdateExecution::new(&m, &store, TranslatorConfig::default());
        exec.execute(&insert_rows(&[1])).unwrap();

        let bad = Command::Update(UpdateStatement::new(
            vec![Assignment::literal("id", TypedValue::Int(9))],
            None,
        ));
        assert!(exec.execute(&bad).is_err());
        assert_eq!(exec.counts(), &[1]);
    }
}
