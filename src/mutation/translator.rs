//! Statement-to-mutation translation
//!
//! Every mutation is keyed by a derived row identifier: the value of the
//! rowid-mapped column, encoded with the order-preserving key codec so
//! written keys land inside the ranges the planner produces for reads.

use crate::codec::{encode_key, serialize};
use crate::exec::{TranslatorError, TranslatorResult};
use crate::observability::{Event, Logger};
use crate::planner::{Filter, PlanError, Planner};
use crate::schema::{ColumnDef, MappingError, TableMapping, ValueSlot, ROWID_COLUMN};
use crate::store::{Mutation, PutCell, ScanRequest, StoreConnection, StoreError};
use crate::types::TypedValue;

use super::statement::{AssignValue, Assignment, DeleteStatement, InputRow, InsertSource, UpdateStatement};

/// Translates relational mutations against one mapped table.
pub struct MutationTranslator<'a> {
    mapping: &'a TableMapping,
    batch_size: usize,
}

impl<'a> MutationTranslator<'a> {
    /// Creates a translator flushing at the given batch size.
    pub fn new(mapping: &'a TableMapping, batch_size: usize) -> Self {
        Self {
            mapping,
            batch_size: batch_size.max(1),
        }
    }

    /// Inserts the rows of `source`, returning the inserted-row count.
    ///
    /// The backing table is created lazily: an unknown-table failure on
    /// writer acquisition triggers one create-then-retry, never more.
    pub fn insert(
        &self,
        conn: &dyn StoreConnection,
        source: &InsertSource,
    ) -> TranslatorResult<u64> {
        let rows = source.rows();
        let mut mutations = Vec::with_capacity(rows.len());
        for row in rows {
            mutations.push(self.encode_insert(row)?);
        }
        if mutations.is_empty() {
            return Ok(0);
        }
        let count = self.write_all(conn, mutations, true)?;
        Ok(count)
    }

    /// Applies an UPDATE, returning the count of distinct rows touched.
    pub fn update(
        &self,
        conn: &dyn StoreConnection,
        statement: &UpdateStatement,
    ) -> TranslatorResult<u64> {
        if statement.parameter_batch.is_some() {
            let err = PlanError::bulk_update_unsupported();
            Logger::warn(
                Event::StatementRejected,
                &[("code", err.code().code()), ("table", self.mapping.table())],
            );
            return Err(err.into());
        }
        let cells = self.encode_assignments(&statement.assignments)?;
        let targets = self.target_rows(conn, statement.filter.as_ref())?;
        if targets.is_empty() {
            return Ok(0);
        }
        let mutations = targets
            .into_iter()
            .map(|row| Mutation::put(row, cells.clone()))
            .collect();
        self.write_all(conn, mutations, false)
    }

    /// Applies a DELETE, returning the count of distinct rows removed.
    pub fn delete(
        &self,
        conn: &dyn StoreConnection,
        statement: &DeleteStatement,
    ) -> TranslatorResult<u64> {
        let targets = self.target_rows(conn, statement.filter.as_ref())?;
        if targets.is_empty() {
            return Ok(0);
        }
        let mutations = targets.into_iter().map(Mutation::delete_row).collect();
        self.write_all(conn, mutations, false)
    }

    /// Encodes one inbound row into a keyed put mutation.
    fn encode_insert(&self, row: &InputRow) -> TranslatorResult<Mutation> {
        let row_key_col = self.mapping.row_key_column();
        let key_value = row
            .get(&row_key_col.name)
            .or_else(|| row.get(ROWID_COLUMN))
            .ok_or_else(|| {
                StoreError::MutationRejected(format!(
                    "insert row has no value for row-key column '{}'",
                    row_key_col.name
                ))
            })?;
        let key = encode_key(key_value)?;

        let mut cells = Vec::new();
        for (name, value) in row {
            if self.mapping.is_row_key_name(name) {
                continue;
            }
            let def = self
                .mapping
                .column(name)
                .ok_or_else(|| MappingError::unknown_column(name.clone()))?;
            // A NULL insert value writes nothing; absence reads back as NULL.
            if value.is_null() {
                continue;
            }
            cells.push(put_cell(def, value)?);
        }
        Ok(Mutation::put(key, cells))
    }

    /// Validates and encodes literal SET clauses into put cells.
    fn encode_assignments(&self, assignments: &[Assignment]) -> TranslatorResult<Vec<PutCell>> {
        let mut cells = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            if self.mapping.is_row_key_name(&assignment.column) {
                let err = PlanError::rowid_reassignment(&assignment.column);
                Logger::warn(
                    Event::StatementRejected,
                    &[("code", err.code().code()), ("table", self.mapping.table())],
                );
                return Err(err.into());
            }
            let value = match &assignment.value {
                AssignValue::Literal(value) => value,
                AssignValue::Parameter(_) => {
                    let err = PlanError::non_literal_assignment(&assignment.column);
                    Logger::warn(
                        Event::StatementRejected,
                        &[("code", err.code().code()), ("table", self.mapping.table())],
                    );
                    return Err(err.into());
                }
            };
            let def = self
                .mapping
                .column(&assignment.column)
                .ok_or_else(|| MappingError::unknown_column(assignment.column.clone()))?;
            cells.push(put_cell(def, value)?);
        }
        Ok(cells)
    }

    /// Plans the WHERE clause and scans for the distinct target row keys.
    fn target_rows(
        &self,
        conn: &dyn StoreConnection,
        filter: Option<&Filter>,
    ) -> TranslatorResult<Vec<Vec<u8>>> {
        let planner = Planner::new(self.mapping);
        let plan = planner.plan_scan(&[], filter, None)?;
        let request = ScanRequest::new(self.mapping.table(), plan.ranges.into_ranges())
            .with_operators(plan.operators);
        let Some(mut cursor) = conn.scan(request)? else {
            return Ok(Vec::new());
        };
        let mut targets: Vec<Vec<u8>> = Vec::new();
        while let Some(cell) = cursor.next_cell()? {
            if targets.last().map(|t| t != &cell.row).unwrap_or(true) {
                targets.push(cell.row);
            }
        }
        Ok(targets)
    }

    /// Writes all mutations through one batch writer, closing it at the end.
    fn write_all(
        &self,
        conn: &dyn StoreConnection,
        mutations: Vec<Mutation>,
        create_if_missing: bool,
    ) -> TranslatorResult<u64> {
        let table = self.mapping.table();
        let mut writer = match conn.writer(table, self.batch_size) {
            Ok(writer) => writer,
            Err(StoreError::TableNotFound(_)) if create_if_missing => {
                conn.create_table(table)?;
                Logger::info(Event::TableCreated, &[("table", table)]);
                conn.writer(table, self.batch_size)?
            }
            Err(err) => return Err(TranslatorError::Store(err)),
        };
        let count = mutations.len() as u64;
        for mutation in mutations {
            writer.write(mutation)?;
        }
        writer.close()?;
        let written = count.to_string();
        Logger::trace(
            Event::BatchFlush,
            &[("mutations", written.as_str()), ("table", table)],
        );
        Ok(count)
    }
}

/// Builds the put cell for one column value per its binding slot.
fn put_cell(def: &ColumnDef, value: &TypedValue) -> TranslatorResult<PutCell> {
    let Some(binding) = &def.binding else {
        return Err(StoreError::MutationRejected(format!(
            "column '{}' is bound to the row key and cannot carry a cell",
            def.name
        ))
        .into());
    };
    let cell = match binding.slot {
        ValueSlot::Value => PutCell {
            family: binding.family.clone(),
            qualifier: binding
                .qualifier
                .as_ref()
                .map(|q| q.as_bytes().to_vec())
                .unwrap_or_default(),
            value: serialize(value),
        },
        // QUALIFIER-slot columns carry the encoded value in the qualifier.
        ValueSlot::Qualifier => PutCell {
            family: binding.family.clone(),
            qualifier: serialize(value),
            value: Vec::new(),
        },
    };
    Ok(cell)
}
