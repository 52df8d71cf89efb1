//! Pushdown operator chain
//!
//! Self-contained scan-time operators shipped into the store's pipeline.
//! Each is described by a flat `{priority, kind, options}` descriptor and
//! reconstructed per partition purely from that descriptor plus the
//! assigned key sub-range; no operator may capture planner-local or
//! connection-local state, because the store runs multiple copies
//! concurrently over disjoint sub-ranges.
//!
//! Chain order follows ascending priority: column filters first, then the
//! residual evaluator, then row counting, so counts only see surviving
//! rows.

mod colfilter;
mod descriptor;
mod eval;
mod residual;
mod rowbuf;
mod rowcount;

pub use descriptor::{options, OperatorDescriptor, OperatorKind};
pub use eval::{evaluate, FlatRow};
pub use rowcount::ROW_COUNT_FAMILY;

use crate::store::{CellCursor, StoreResult};

use colfilter::ColumnFilterOperator;
use residual::ResidualFilterOperator;
use rowcount::RowCountOperator;

/// Builds the operator chain for one scan partition.
///
/// Descriptors are applied in ascending priority order, each wrapping the
/// cursor below it. The same descriptor list can be passed here once per
/// partition; every call builds fresh operator state.
pub fn build_chain(
    descriptors: &[OperatorDescriptor],
    base: Box<dyn CellCursor>,
) -> StoreResult<Box<dyn CellCursor>> {
    let mut ordered: Vec<&OperatorDescriptor> = descriptors.iter().collect();
    ordered.sort_by_key(|d| d.priority);

    let mut cursor = base;
    for descriptor in ordered {
        cursor = match descriptor.kind {
            OperatorKind::ColumnFilter => {
                Box::new(ColumnFilterOperator::from_descriptor(descriptor, cursor)?)
            }
            OperatorKind::ResidualFilter => {
                Box::new(ResidualFilterOperator::from_descriptor(descriptor, cursor)?)
            }
            OperatorKind::RowCount => Box::new(RowCountOperator::new(cursor)),
        };
    }
    Ok(cursor)
}
