//! Predicate evaluation over partially built row-sets
//!
//! System views build their rows in stages, adding columns as they go, and
//! filter after each stage so later (more expensive) stages only run for rows
//! that can still match. [`PushdownPredicate`] makes that possible: it splits
//! the pushed-down filters into conjuncts and, for a given batch, applies only
//! those conjuncts whose columns all exist in that batch. Conjuncts over
//! columns that are not there yet are treated as true.
//!
//! This is a pre-filter only. Views report every filter as `Inexact`, so
//! DataFusion re-applies the complete predicate to the final rows.

use std::sync::Arc;

use datafusion::arrow::array::{Array, AsArray};
use datafusion::arrow::compute::filter_record_batch;
use datafusion::arrow::datatypes::Schema;
use datafusion::arrow::record_batch::RecordBatch;
use datafusion::common::DFSchema;
use datafusion::logical_expr::execution_props::ExecutionProps;
use datafusion::logical_expr::expr_rewriter::unnormalize_col;
use datafusion::logical_expr::utils::{conjunction, split_conjunction};
use datafusion::logical_expr::Expr;
use datafusion::physical_expr::create_physical_expr;

use crate::error::{Result, ViewError};

/// Conjunctive predicate applied stage by stage
#[derive(Debug, Clone)]
pub struct PushdownPredicate<'a> {
    conjuncts: Vec<Expr>,
    props: &'a ExecutionProps,
}

impl<'a> PushdownPredicate<'a> {
    pub fn new(filters: &[Expr], props: &'a ExecutionProps) -> Self {
        let conjuncts = filters
            .iter()
            .flat_map(|filter| split_conjunction(filter))
            .map(|expr| unnormalize_col(expr.clone()))
            .collect();
        Self { conjuncts, props }
    }

    /// Predicate that keeps every row
    pub fn always_true(props: &'a ExecutionProps) -> Self {
        Self {
            conjuncts: Vec::new(),
            props,
        }
    }

    pub fn conjuncts(&self) -> &[Expr] {
        &self.conjuncts
    }

    /// Conjunction of every conjunct that only references columns of `schema`.
    fn applicable_to(&self, schema: &Schema) -> Option<Expr> {
        let applicable = self.conjuncts.iter().filter(|expr| {
            expr.column_refs()
                .iter()
                .all(|column| schema.field_with_name(&column.name).is_ok())
        });
        conjunction(applicable.cloned())
    }

    /// Keep only the rows of `batch` that satisfy every applicable conjunct.
    ///
    /// Rows for which the predicate evaluates to NULL are dropped.
    pub fn filter_batch(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let schema = batch.schema();
        let Some(predicate) = self.applicable_to(&schema) else {
            return Ok(batch.clone());
        };

        let df_schema = DFSchema::try_from(Arc::clone(&schema))?;
        let physical = create_physical_expr(&predicate, &df_schema, self.props)?;
        let mask = physical.evaluate(batch)?.into_array(batch.num_rows())?;

        let mask = mask.as_boolean_opt().ok_or_else(|| {
            ViewError::InvalidPredicate(format!(
                "'{}' evaluated to {} instead of Boolean",
                predicate,
                mask.data_type()
            ))
        })?;

        Ok(filter_record_batch(batch, mask)?)
    }
}
