//! Read execution lifecycle
//!
//! A read moves through constructed → executed → consumed → closed, in that
//! order. `next()` is only legal between execute and close; close is
//! idempotent; `cancel()` may be called concurrently from another thread and
//! makes the next `next()` return end-of-stream.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::assembler::{sum_row_counts, Row, RowAssembler};
use crate::observability::{Event, Logger};
use crate::planner::{Aggregate, Planner};
use crate::schema::TableMapping;
use crate::store::{ScanRequest, StoreConnection};
use crate::types::TypedValue;

use super::command::SelectCommand;
use super::config::TranslatorConfig;
use super::errors::{TranslatorError, TranslatorResult};

/// Output column name of a COUNT(*) read.
pub const COUNT_COLUMN: &str = "count";

/// Cooperative cancellation handle, shareable across threads.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates an uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns true once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Whether a read came in as a plain select or a procedure-shaped call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionKind {
    Read,
    Procedure,
}

enum ExecState {
    Constructed,
    Executed,
    Consumed,
    Closed,
}

/// One read execution against one mapped table.
pub struct ReadExecution<'a> {
    mapping: &'a TableMapping,
    conn: &'a dyn StoreConnection,
    command: SelectCommand,
    config: TranslatorConfig,
    kind: ExecutionKind,
    cancel: CancelToken,
    state: ExecState,
    assembler: Option<RowAssembler>,
    pending_count: Option<i64>,
    out_params: Vec<TypedValue>,
    rows_returned: u64,
}

impl<'a> ReadExecution<'a> {
    /// Constructs a plain read.
    pub fn new(
        mapping: &'a TableMapping,
        conn: &'a dyn StoreConnection,
        command: SelectCommand,
        config: TranslatorConfig,
    ) -> Self {
        Self::with_kind(mapping, conn, command, config, ExecutionKind::Read)
    }

    /// Constructs a procedure-shaped direct read.
    pub fn procedure(
        mapping: &'a TableMapping,
        conn: &'a dyn StoreConnection,
        command: SelectCommand,
        config: TranslatorConfig,
    ) -> Self {
        Self::with_kind(mapping, conn, command, config, ExecutionKind::Procedure)
    }

    fn with_kind(
        mapping: &'a TableMapping,
        conn: &'a dyn StoreConnection,
        command: SelectCommand,
        config: TranslatorConfig,
        kind: ExecutionKind,
    ) -> Self {
        Self {
            mapping,
            conn,
            command,
            config,
            kind,
            cancel: CancelToken::new(),
            state: ExecState::Constructed,
            assembler: None,
            pending_count: None,
            out_params: Vec::new(),
            rows_returned: 0,
        }
    }

    /// Returns how this read was shaped.
    pub fn kind(&self) -> ExecutionKind {
        self.kind
    }

    /// Returns a handle another thread can cancel this read through.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Plans the command and opens the store scan.
    pub fn execute(&mut self) -> TranslatorResult<()> {
        if !matches!(self.state, ExecState::Constructed) {
            return Err(TranslatorError::InvalidState(
                "execute() is only legal on a constructed read".into(),
            ));
        }
        let planner = Planner::new(self.mapping);
        let plan = planner.plan_scan(
            &self.command.columns,
            self.command.filter.as_ref(),
            self.command.aggregate,
        )?;
        let range_count = plan.ranges.ranges().len().to_string();
        let residual = plan.residual.to_string();
        Logger::trace(
            Event::PlanBuilt,
            &[
                ("ranges", range_count.as_str()),
                ("residual", residual.as_str()),
                ("table", self.mapping.table()),
            ],
        );

        let partitions = self.config.scan_partitions;
        let request = ScanRequest::new(self.mapping.table(), plan.ranges.into_ranges())
            .with_operators(plan.operators)
            .with_partitions(partitions);
        let parts = partitions.to_string();
        Logger::info(
            Event::ScanOpen,
            &[("partitions", parts.as_str()), ("table", self.mapping.table())],
        );

        let cursor = self.conn.scan(request)?;
        match self.command.aggregate {
            // Partition count cells sum into one result row.
            Some(Aggregate::CountStar) => {
                self.pending_count = Some(sum_row_counts(cursor)?);
            }
            None => {
                self.assembler = Some(RowAssembler::new(cursor, plan.projection));
            }
        }
        self.state = ExecState::Executed;
        Ok(())
    }

    /// Pulls the next result row.
    ///
    /// Returns None at end-of-stream and after cancellation.
    pub fn next(&mut self) -> TranslatorResult<Option<Row>> {
        match self.state {
            ExecState::Constructed => {
                return Err(TranslatorError::InvalidState(
                    "next() before execute()".into(),
                ))
            }
            ExecState::Closed => {
                return Err(TranslatorError::InvalidState("next() after close()".into()))
            }
            ExecState::Consumed => return Ok(None),
            ExecState::Executed => {}
        }
        if self.cancel.is_cancelled() {
            Logger::info(Event::ExecutionCancelled, &[("table", self.mapping.table())]);
            self.state = ExecState::Consumed;
            return Ok(None);
        }
        if let Some(count) = self.pending_count.take() {
            let mut row = Row::new();
            row.set(COUNT_COLUMN, TypedValue::Int(count));
            self.rows_returned += 1;
            self.state = ExecState::Consumed;
            return Ok(Some(row));
        }
        let Some(assembler) = self.assembler.as_mut() else {
            self.state = ExecState::Consumed;
            return Ok(None);
        };
        match assembler.next_row()? {
            Some(row) => {
                self.rows_returned += 1;
                Ok(Some(row))
            }
            None => {
                self.state = ExecState::Consumed;
                Ok(None)
            }
        }
    }

    /// Returns the output parameters of a procedure-shaped read.
    ///
    /// This translator version never populates them.
    pub fn output_parameters(&self) -> &[TypedValue] {
        &self.out_params
    }

    /// Releases the scan. Idempotent.
    pub fn close(&mut self) {
        if matches!(self.state, ExecState::Closed) {
            return;
        }
        if let Some(assembler) = self.assembler.as_mut() {
            assembler.close();
        }
        let rows = self.rows_returned.to_string();
        Logger::info(
            Event::ScanComplete,
            &[("rows", rows.as_str()), ("table", self.mapping.table())],
        );
        self.state = ExecState::Closed;
    }
}
