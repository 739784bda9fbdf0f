//! Dynamic tables: ordered collections of equal-length columns.

use std::collections::HashSet;
use std::ops::Range;

use dyntab_common::{Result, error::Error, verify_arg};
use dyntab_sequence::{
    column::VectorData,
    index::VectorIndex,
    offsets::Offsets,
    values::{Value, Values},
};

use crate::record::{Cell, Record};
use crate::region::TableRegion;

/// Field names that can never be data columns.
const RESERVED_NAMES: [&str; 4] = ["id", "name", "description", "colnames"];

/// Suffix marking a field name as an index candidate.
const INDEX_SUFFIX: &str = "_index";

/// A column being added to a table, before linking.
#[derive(Debug, Clone)]
pub enum TableItem {
    Column(VectorData),
    Index(VectorIndex),
    Region(TableRegion),
}

impl TableItem {
    fn name(&self) -> &str {
        match self {
            TableItem::Column(data) => data.name(),
            TableItem::Index(index) => index.name(),
            TableItem::Region(region) => region.name(),
        }
    }
}

/// The storage behind one column slot.
#[derive(Debug, Clone)]
enum ColumnKind {
    /// Plain or ragged data.
    Data(VectorData),
    /// Row references into another table.
    Region(TableRegion),
    /// An index whose target never resolved, retained as a degenerate
    /// integer column holding its exclusive upper bounds.
    FreeIndex(VectorIndex),
}

/// One column of a table: storage plus the index linked to it, if any.
#[derive(Debug, Clone)]
struct ColumnSlot {
    kind: ColumnKind,
    index: Option<VectorIndex>,
}

impl ColumnSlot {
    fn name(&self) -> &str {
        match &self.kind {
            ColumnKind::Data(data) => data.name(),
            ColumnKind::Region(region) => region.name(),
            ColumnKind::FreeIndex(index) => index.name(),
        }
    }

    /// Flat storage length, before resolving through the linked index.
    fn flat_len(&self) -> usize {
        match &self.kind {
            ColumnKind::Data(data) => data.len(),
            ColumnKind::Region(region) => region.len(),
            ColumnKind::FreeIndex(index) => index.len(),
        }
    }

    /// Number of logical rows, after resolving through the linked index.
    fn logical_len(&self) -> usize {
        match &self.index {
            Some(index) => index.len(),
            None => self.flat_len(),
        }
    }
}

/// A named, ordered collection of equal-length columns plus a parallel
/// row-identifier column.
///
/// Columns are plain data, ragged data (a flat buffer carved into
/// variable-length logical rows by a linked index), or row-references into
/// another table. Every column resolves to exactly `len()` logical rows.
///
/// Tables are built through [`TableBuilder`] and are read-mostly
/// thereafter: the single sanctioned mutation is [`append`], which re-runs
/// linking and the length invariant in full. Constructed tables are
/// typically wrapped in `Arc` so region columns of other tables can share
/// them.
///
/// [`append`]: DynamicTable::append
#[derive(Debug, Clone)]
pub struct DynamicTable {
    name: String,
    description: String,
    row_ids: Vec<i64>,
    slots: Vec<ColumnSlot>,
    column_order: Vec<String>,
}

impl DynamicTable {
    /// Starts building a table. Equivalent to [`TableBuilder::new`].
    pub fn builder(name: impl Into<String>, description: impl Into<String>) -> TableBuilder {
        TableBuilder::new(name, description)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Row identifiers, parallel to the logical rows.
    pub fn ids(&self) -> &[i64] {
        &self.row_ids
    }

    /// Data-column names in display order. Excludes reserved fields and
    /// `_index`-suffixed names.
    pub fn column_names(&self) -> &[String] {
        &self.column_order
    }

    /// Returns `true` if a column with the given name is addressable,
    /// including retained free-standing indices.
    pub fn has_column(&self, name: &str) -> bool {
        self.slots.iter().any(|slot| slot.name() == name)
    }

    /// Number of logical rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.row_ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.row_ids.is_empty()
    }

    /// Reads a single cell.
    ///
    /// Plain columns yield a scalar, ragged columns the logical row as a
    /// homogeneous slice, region columns the referenced target row (or
    /// list of rows when ragged), resolved lazily here.
    pub fn cell(&self, row: usize, column: &str) -> Result<Cell> {
        self.check_row(row)?;
        let slot = self.slot(column)?;
        self.slot_cell(slot, row)
    }

    /// Reads one logical row across all columns in display order, the `id`
    /// entry first.
    pub fn row(&self, row: usize) -> Result<Record> {
        self.check_row(row)?;
        let mut record = Record::with_capacity(self.column_order.len() + 1);
        record.push("id", Cell::Scalar(Value::Int(self.row_ids[row])));
        for name in &self.column_order {
            let slot = self.slot(name)?;
            record.push(name.clone(), self.slot_cell(slot, row)?);
        }
        Ok(record)
    }

    /// Reads a full column as one ordered sequence of `len()` logical rows,
    /// resolved through its index if ragged.
    pub fn column(&self, column: &str) -> Result<Vec<Cell>> {
        let slot = self.slot(column)?;
        (0..self.len())
            .map(|row| self.slot_cell(slot, row))
            .collect()
    }

    /// Iterates over logical rows in row-id order.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            table: self,
            row: 0,
        }
    }

    /// Builds a sub-table holding the selected logical rows of every
    /// column, in the requested order. Row identity is preserved: the
    /// sub-table's ids are the corresponding subset of this table's ids,
    /// so a row position may be selected at most once.
    ///
    /// Ragged columns are re-flattened with rebuilt offsets; region columns
    /// keep their shared target table.
    pub fn select(&self, rows: &[usize]) -> Result<DynamicTable> {
        for &row in rows {
            self.check_row(row)?;
        }
        let mut unique = HashSet::new();
        verify_arg!(rows, rows.iter().all(|row| unique.insert(*row)));
        let slots = self
            .slots
            .iter()
            .map(|slot| self.select_slot(slot, rows))
            .collect();
        Ok(DynamicTable {
            name: self.name.clone(),
            description: self.description.clone(),
            row_ids: rows.iter().map(|&row| self.row_ids[row]).collect(),
            slots,
            column_order: self.column_order.clone(),
        })
    }

    /// Builds a sub-table holding a contiguous range of logical rows.
    pub fn slice(&self, range: Range<usize>) -> Result<DynamicTable> {
        if range.end > self.len() {
            return Err(Error::out_of_range("row", range.end, self.len()));
        }
        self.select(&range.collect::<Vec<_>>())
    }

    /// Builds a sub-table restricted to the selected rows and the given
    /// column subset, in the requested column order. Column names may not
    /// repeat.
    pub fn project(&self, rows: &[usize], columns: &[&str]) -> Result<DynamicTable> {
        let mut seen = HashSet::new();
        verify_arg!(columns, columns.iter().all(|name| seen.insert(*name)));
        let sub = self.select(rows)?;
        let mut slots = Vec::with_capacity(columns.len());
        for &name in columns {
            slots.push(sub.slot(name)?.clone());
        }
        let column_order = columns
            .iter()
            .filter(|name| !name.ends_with(INDEX_SUFFIX))
            .map(|name| name.to_string())
            .collect();
        Ok(DynamicTable {
            name: sub.name,
            description: sub.description,
            row_ids: sub.row_ids,
            slots,
            column_order,
        })
    }

    /// Appends a new named column, re-running linking and the length
    /// invariant in full. On failure the table is left unchanged.
    ///
    /// An appended data or region column may pair with a retained
    /// free-standing index; an appended index may attach to an existing
    /// column (making it ragged) or be retained free-standing.
    pub fn append(&mut self, item: TableItem) -> Result<()> {
        let name = item.name();
        if RESERVED_NAMES.contains(&name) {
            return Err(Error::invalid_arg(name, "column name is reserved"));
        }
        if self.contains_name(name) {
            return Err(Error::invalid_arg(name, "column name already in use"));
        }
        match item {
            TableItem::Column(data) => {
                let index = self.claim_free_index(data.name(), data.len())?;
                self.push_slot(ColumnSlot {
                    kind: ColumnKind::Data(data),
                    index,
                });
                Ok(())
            }
            TableItem::Region(region) => {
                let index = self.claim_free_index(region.name(), region.len())?;
                self.push_slot(ColumnSlot {
                    kind: ColumnKind::Region(region),
                    index,
                });
                Ok(())
            }
            TableItem::Index(index) => self.append_index(index),
        }
    }

    /// Appends a raw value sequence under a bare name, coercing it the same
    /// way the builder does: to a generic index when the name ends in
    /// `_index` and the values are integers, to a generic column otherwise.
    pub fn append_values(&mut self, name: impl Into<String>, values: impl Into<Values>) -> Result<()> {
        self.append(coerce_raw(name.into(), values.into())?)
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row < self.len() {
            Ok(())
        } else {
            Err(Error::out_of_range("row", row, self.len()))
        }
    }

    fn slot(&self, name: &str) -> Result<&ColumnSlot> {
        self.slots
            .iter()
            .find(|slot| slot.name() == name)
            .ok_or_else(|| Error::unknown_column(&self.name, name))
    }

    fn contains_name(&self, name: &str) -> bool {
        self.slots.iter().any(|slot| {
            slot.name() == name
                || slot
                    .index
                    .as_ref()
                    .is_some_and(|index| index.name() == name)
        })
    }

    fn slot_cell(&self, slot: &ColumnSlot, row: usize) -> Result<Cell> {
        match (&slot.kind, &slot.index) {
            (ColumnKind::Data(data), None) => Ok(Cell::Scalar(data.value_at(row))),
            (ColumnKind::Data(data), Some(index)) => {
                Ok(Cell::List(data.values().slice(index.range_at(row))))
            }
            (ColumnKind::Region(region), None) => Ok(Cell::Row(region.resolve(row)?)),
            (ColumnKind::Region(region), Some(index)) => {
                let records = index
                    .range_at(row)
                    .map(|pos| region.resolve(pos))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Cell::Rows(records))
            }
            (ColumnKind::FreeIndex(index), _) => {
                let bound = index.offsets().as_slice()[row + 1];
                Ok(Cell::Scalar(Value::Int(bound as i64)))
            }
        }
    }

    fn select_slot(&self, slot: &ColumnSlot, rows: &[usize]) -> ColumnSlot {
        match (&slot.kind, &slot.index) {
            (ColumnKind::Data(data), None) => ColumnSlot {
                kind: ColumnKind::Data(data.with_values(data.values().take(rows))),
                index: None,
            },
            (ColumnKind::Data(data), Some(index)) => {
                let mut values = data.values().empty_like();
                let mut offsets = Offsets::with_capacity(rows.len());
                for &row in rows {
                    let range = index.range_at(row);
                    offsets.push_length(range.len());
                    values.extend_from(&data.values().slice(range));
                }
                ColumnSlot {
                    kind: ColumnKind::Data(data.with_values(values)),
                    index: Some(VectorIndex::new(index.name(), offsets)),
                }
            }
            (ColumnKind::Region(region), None) => ColumnSlot {
                kind: ColumnKind::Region(
                    region.with_rows(rows.iter().map(|&row| region.rows()[row]).collect()),
                ),
                index: None,
            },
            (ColumnKind::Region(region), Some(index)) => {
                let mut flat = Vec::new();
                let mut offsets = Offsets::with_capacity(rows.len());
                for &row in rows {
                    let range = index.range_at(row);
                    offsets.push_length(range.len());
                    flat.extend_from_slice(&region.rows()[range]);
                }
                ColumnSlot {
                    kind: ColumnKind::Region(region.with_rows(flat)),
                    index: Some(VectorIndex::new(index.name(), offsets)),
                }
            }
            // A subset of exclusive upper bounds is no longer a valid
            // offsets sequence; the free index degrades to the plain
            // integer column it already reads as.
            (ColumnKind::FreeIndex(index), _) => {
                let bounds: Vec<i64> = rows
                    .iter()
                    .map(|&row| index.offsets().as_slice()[row + 1] as i64)
                    .collect();
                ColumnSlot {
                    kind: ColumnKind::Data(VectorData::new(index.name(), "", bounds)),
                    index: None,
                }
            }
        }
    }

    /// Finds the free-standing index claiming `name`, validates it against
    /// the new column's flat length and the table's row count, and detaches
    /// it. Two claimants are ambiguous.
    fn claim_free_index(&mut self, name: &str, flat_len: usize) -> Result<Option<VectorIndex>> {
        let mut claims = self.slots.iter().enumerate().filter_map(|(pos, slot)| {
            match &slot.kind {
                ColumnKind::FreeIndex(index) => {
                    let target = index.target().or_else(|| index.conventional_target());
                    (target == Some(name)).then_some((pos, index))
                }
                _ => None,
            }
        });
        let Some((pos, index)) = claims.next() else {
            // No index pairs with the new column, so it contributes its
            // flat length as logical rows.
            if flat_len != self.len() {
                return Err(Error::equal_length(&self.name, name, self.len(), flat_len));
            }
            return Ok(None);
        };
        if let Some((_, second)) = claims.next() {
            return Err(Error::ambiguous_index_target(
                name,
                index.name(),
                second.name(),
            ));
        }
        check_link(index, name, flat_len)?;
        if index.len() != self.len() {
            return Err(Error::equal_length(&self.name, name, self.len(), index.len()));
        }
        let ColumnKind::FreeIndex(index) = self.slots.remove(pos).kind else {
            unreachable!()
        };
        Ok(Some(index))
    }

    fn append_index(&mut self, index: VectorIndex) -> Result<()> {
        let target = index
            .target()
            .or_else(|| index.conventional_target())
            .map(str::to_string);
        let pos = target
            .as_deref()
            .and_then(|t| self.slots.iter().position(|slot| slot.name() == t));
        match pos {
            Some(pos) if !matches!(self.slots[pos].kind, ColumnKind::FreeIndex(_)) => {
                let target = target.unwrap();
                if let Some(existing) = &self.slots[pos].index {
                    return Err(Error::ambiguous_index_target(
                        &target,
                        existing.name(),
                        index.name(),
                    ));
                }
                check_link(&index, &target, self.slots[pos].flat_len())?;
                if index.len() != self.len() {
                    return Err(Error::equal_length(
                        &self.name,
                        &target,
                        self.len(),
                        index.len(),
                    ));
                }
                self.slots[pos].index = Some(index);
                Ok(())
            }
            _ => {
                if index.len() != self.len() {
                    return Err(Error::equal_length(
                        &self.name,
                        index.name(),
                        self.len(),
                        index.len(),
                    ));
                }
                self.push_slot(ColumnSlot {
                    kind: ColumnKind::FreeIndex(index),
                    index: None,
                });
                Ok(())
            }
        }
    }

    fn push_slot(&mut self, slot: ColumnSlot) {
        let name = slot.name().to_string();
        self.slots.push(slot);
        if !name.ends_with(INDEX_SUFFIX) {
            self.column_order.push(name);
        }
    }
}

/// Iterator over the logical rows of a table, in row-id order.
///
/// Yields `Result` because region columns resolve lazily and may dangle.
pub struct Rows<'a> {
    table: &'a DynamicTable,
    row: usize,
}

impl Iterator for Rows<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.row < self.table.len() {
            let record = self.table.row(self.row);
            self.row += 1;
            Some(record)
        } else {
            None
        }
    }
}

/// Validates a resolved index/column pairing: the index's last offset must
/// cover the target's flat storage exactly.
fn check_link(index: &VectorIndex, target: &str, flat_len: usize) -> Result<()> {
    if index.offsets().last() as usize != flat_len {
        return Err(Error::invalid_arg(
            index.name().to_string(),
            format!(
                "last offset {} must equal the length {flat_len} of target column '{target}'",
                index.offsets().last()
            ),
        ));
    }
    Ok(())
}

/// Coerces a raw value sequence supplied under a bare name: integer values
/// under an `_index`-suffixed name become a generic index, anything else a
/// generic column.
fn coerce_raw(name: String, values: Values) -> Result<TableItem> {
    if name.ends_with(INDEX_SUFFIX)
        && let Some(ints) = values.as_ints()
    {
        let mut bounds = Vec::with_capacity(ints.len());
        for &v in ints {
            if v < 0 {
                return Err(Error::invalid_arg(name, format!("negative offset {v}")));
            }
            bounds.push(v as u64);
        }
        let offsets = Offsets::from_bounds(&bounds)?;
        return Ok(TableItem::Index(VectorIndex::new(name, offsets)));
    }
    Ok(TableItem::Column(VectorData::new(name, "", values)))
}

enum BuilderItem {
    Typed(TableItem),
    Raw(String, Values),
}

/// Builder for [`DynamicTable`].
///
/// Columns, indices, regions and raw value sequences are declared in
/// insertion order; [`build`](TableBuilder::build) then runs the whole
/// construction pass (raw-value coercion, index linking, row-id synthesis,
/// column-order inference and the equal-length validation) and either
/// yields a fully validated table or fails without side effects.
pub struct TableBuilder {
    name: String,
    description: String,
    row_ids: Option<Vec<i64>>,
    column_order: Option<Vec<String>>,
    items: Vec<BuilderItem>,
}

impl TableBuilder {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> TableBuilder {
        TableBuilder {
            name: name.into(),
            description: description.into(),
            row_ids: None,
            column_order: None,
            items: Vec::new(),
        }
    }

    /// Supplies explicit row identifiers. When absent, ids are synthesized
    /// as `0..N`.
    pub fn with_row_ids(mut self, row_ids: Vec<i64>) -> TableBuilder {
        self.row_ids = Some(row_ids);
        self
    }

    /// Supplies an explicit (possibly partial) column display order.
    /// Declared columns not named here are appended in declaration order.
    pub fn with_column_order<I, S>(mut self, names: I) -> TableBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_order = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_column(mut self, column: VectorData) -> TableBuilder {
        self.items.push(BuilderItem::Typed(TableItem::Column(column)));
        self
    }

    pub fn with_index(mut self, index: VectorIndex) -> TableBuilder {
        self.items.push(BuilderItem::Typed(TableItem::Index(index)));
        self
    }

    pub fn with_region(mut self, region: TableRegion) -> TableBuilder {
        self.items.push(BuilderItem::Typed(TableItem::Region(region)));
        self
    }

    /// Declares an untyped raw sequence under a bare name, coerced at build
    /// time per the `_index` naming convention.
    pub fn with_values(mut self, name: impl Into<String>, values: impl Into<Values>) -> TableBuilder {
        self.items.push(BuilderItem::Raw(name.into(), values.into()));
        self
    }

    /// Runs the construction pass and returns the validated table.
    pub fn build(self) -> Result<DynamicTable> {
        let name = self.name;

        // Coercion of raw sequences into typed columns and indices.
        let mut items = Vec::with_capacity(self.items.len());
        for item in self.items {
            items.push(match item {
                BuilderItem::Typed(item) => item,
                BuilderItem::Raw(raw_name, values) => coerce_raw(raw_name, values)?,
            });
        }

        let mut seen = HashSet::new();
        for item in &items {
            if RESERVED_NAMES.contains(&item.name()) {
                return Err(Error::invalid_arg(item.name(), "column name is reserved"));
            }
            if !seen.insert(item.name().to_string()) {
                return Err(Error::invalid_arg(item.name(), "column name already in use"));
            }
        }

        // Linking: resolve each index to its target, in declared order.
        // claims[i] is the position of the index item that carved item i.
        let mut claims: Vec<Option<usize>> = vec![None; items.len()];
        for (pos, item) in items.iter().enumerate() {
            let index = match item {
                TableItem::Index(index) => index,
                _ => continue,
            };
            let target = index.target().or_else(|| index.conventional_target());
            let Some(target) = target else { continue };
            let Some(target_pos) = items
                .iter()
                .position(|it| !matches!(it, TableItem::Index(_)) && it.name() == target)
            else {
                continue;
            };
            if let Some(first) = claims[target_pos] {
                let TableItem::Index(first) = &items[first] else {
                    unreachable!()
                };
                return Err(Error::ambiguous_index_target(
                    target,
                    first.name(),
                    index.name(),
                ));
            }
            claims[target_pos] = Some(pos);
        }

        // Assembly: resolved indices attach to their target slot, the rest
        // are retained free-standing in declaration order.
        let consumed: HashSet<usize> = claims.iter().flatten().copied().collect();
        let mut slots = Vec::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            let index = claims[pos].map(|claim| {
                let TableItem::Index(index) = &items[claim] else {
                    unreachable!()
                };
                index.clone()
            });
            match item {
                TableItem::Column(data) => {
                    if let Some(index) = &index {
                        check_link(index, data.name(), data.len())?;
                    }
                    slots.push(ColumnSlot {
                        kind: ColumnKind::Data(data.clone()),
                        index,
                    });
                }
                TableItem::Region(region) => {
                    if let Some(index) = &index {
                        check_link(index, region.name(), region.len())?;
                    }
                    slots.push(ColumnSlot {
                        kind: ColumnKind::Region(region.clone()),
                        index,
                    });
                }
                TableItem::Index(idx) => {
                    if !consumed.contains(&pos) {
                        slots.push(ColumnSlot {
                            kind: ColumnKind::FreeIndex(idx.clone()),
                            index: None,
                        });
                    }
                }
            }
        }

        // Row ids: explicit (must be unique) or synthesized 0..N from the
        // widest resolved column.
        let row_ids = match self.row_ids {
            Some(row_ids) => {
                let mut unique = HashSet::new();
                verify_arg!(row_ids, row_ids.iter().all(|id| unique.insert(*id)));
                row_ids
            }
            None => {
                let n = slots.iter().map(ColumnSlot::logical_len).max().unwrap_or(0);
                (0..n as i64).collect()
            }
        };

        // Column order: the explicitly supplied partial order first, then
        // every remaining data column in declaration order.
        let mut column_order = Vec::new();
        if let Some(explicit) = self.column_order {
            for col in explicit {
                if col.ends_with(INDEX_SUFFIX) {
                    return Err(Error::invalid_arg(col, "index columns have no display order"));
                }
                if !slots.iter().any(|slot| slot.name() == col) {
                    return Err(Error::unknown_column(&name, col));
                }
                if column_order.contains(&col) {
                    return Err(Error::invalid_arg(col, "column listed twice in column order"));
                }
                column_order.push(col);
            }
        }
        for slot in &slots {
            let slot_name = slot.name();
            if !slot_name.ends_with(INDEX_SUFFIX)
                && !column_order.iter().any(|c| c == slot_name)
            {
                column_order.push(slot_name.to_string());
            }
        }

        // The length invariant: every resolved column has exactly N
        // logical rows.
        let n = row_ids.len();
        for slot in &slots {
            if slot.logical_len() != n {
                return Err(Error::equal_length(
                    &name,
                    slot.name(),
                    n,
                    slot.logical_len(),
                ));
            }
        }

        Ok(DynamicTable {
            name,
            description: self.description,
            row_ids,
            slots,
            column_order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dyntab_common::error::ErrorKind;

    fn ragged_table() -> DynamicTable {
        TableBuilder::new("trials", "per-trial measurements")
            .with_column(VectorData::new("start_time", "", vec![0.0f64, 5.0, 9.0]))
            .with_column(VectorData::new(
                "spike_times",
                "",
                vec![10.0f64, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0],
            ))
            .with_index(VectorIndex::new(
                "spike_times_index",
                Offsets::from_bounds(&[3, 5, 9]).unwrap(),
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_plain() {
        let table = TableBuilder::new("t", "")
            .with_column(VectorData::new("a", "", vec![1i64, 2, 3]))
            .with_column(VectorData::new("b", "", vec!["x", "y", "z"]))
            .build()
            .unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.ids(), &[0, 1, 2]);
        assert_eq!(table.column_names(), &["a", "b"]);
        assert_eq!(table.cell(1, "b").unwrap(), Cell::Scalar(Value::Text("y".into())));
    }

    #[test]
    fn test_build_empty() {
        let table = TableBuilder::new("t", "").build().unwrap();
        assert_eq!(table.len(), 0);
        assert!(table.is_empty());
        assert!(table.column_names().is_empty());
    }

    #[test]
    fn test_ragged_rows() {
        let table = ragged_table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.column_names(), &["start_time", "spike_times"]);
        assert_eq!(
            table.cell(0, "spike_times").unwrap(),
            Cell::List(Values::from(vec![10.0f64, 20.0, 30.0]))
        );
        assert_eq!(
            table.cell(1, "spike_times").unwrap(),
            Cell::List(Values::from(vec![40.0f64, 50.0]))
        );
        assert_eq!(
            table.cell(2, "spike_times").unwrap(),
            Cell::List(Values::from(vec![60.0f64, 70.0, 80.0, 90.0]))
        );
    }

    #[test]
    fn test_explicit_index_target() {
        let table = TableBuilder::new("t", "")
            .with_column(VectorData::new("members", "", vec![1i64, 2, 3, 4]))
            .with_index(
                VectorIndex::new("groups", Offsets::from_bounds(&[1, 4]).unwrap())
                    .with_target("members"),
            )
            .build()
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.cell(1, "members").unwrap(),
            Cell::List(Values::from(vec![2i64, 3, 4]))
        );
    }

    #[test]
    fn test_ambiguous_index_target() {
        let err = TableBuilder::new("t", "")
            .with_column(VectorData::new("a", "", vec![1i64, 2]))
            .with_index(VectorIndex::new("a_index", Offsets::from_bounds(&[1, 2]).unwrap()))
            .with_index(
                VectorIndex::new("other", Offsets::from_bounds(&[0, 2]).unwrap()).with_target("a"),
            )
            .build()
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::AmbiguousIndexTarget { column, .. } if column == "a"
        ));
    }

    #[test]
    fn test_unresolved_index_is_free_standing() {
        let table = TableBuilder::new("t", "")
            .with_column(VectorData::new("a", "", vec![1i64, 2, 3]))
            .with_index(VectorIndex::new(
                "missing_index",
                Offsets::from_bounds(&[1, 2, 3]).unwrap(),
            ))
            .build()
            .unwrap();
        // Readable by name as an integer column, but not part of the
        // display order.
        assert_eq!(table.column_names(), &["a"]);
        assert!(table.has_column("missing_index"));
        assert_eq!(
            table.cell(1, "missing_index").unwrap(),
            Cell::Scalar(Value::Int(2))
        );
    }

    #[test]
    fn test_equal_length_violation() {
        let err = TableBuilder::new("t", "")
            .with_column(VectorData::new("a", "", vec![1i64, 2, 3]))
            .with_column(VectorData::new("b", "", vec![1i64, 2]))
            .build()
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::EqualLengthViolation { table, column, expected: 3, actual: 2 }
                if table == "t" && column == "b"
        ));
    }

    #[test]
    fn test_index_length_counts_logical_rows() {
        // Nine flat values resolve to three logical rows, matching the
        // three-row id column.
        let table = TableBuilder::new("t", "")
            .with_row_ids(vec![7, 8, 9])
            .with_column(VectorData::new(
                "v",
                "",
                vec![0i64, 1, 2, 3, 4, 5, 6, 7, 8],
            ))
            .with_index(VectorIndex::new(
                "v_index",
                Offsets::from_bounds(&[3, 5, 9]).unwrap(),
            ))
            .build()
            .unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.ids(), &[7, 8, 9]);
    }

    #[test]
    fn test_index_must_cover_target() {
        let err = TableBuilder::new("t", "")
            .with_column(VectorData::new("v", "", vec![1i64, 2, 3, 4]))
            .with_index(VectorIndex::new(
                "v_index",
                Offsets::from_bounds(&[1, 3]).unwrap(),
            ))
            .build()
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
    }

    #[test]
    fn test_raw_value_coercion() {
        let table = TableBuilder::new("t", "")
            .with_values("stop_time", vec![1.0f64, 2.0])
            .with_values("tags", vec!["a", "b", "c"])
            .with_values("tags_index", vec![1i64, 3])
            .build()
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.column_names(), &["stop_time", "tags"]);
        assert_eq!(
            table.cell(1, "tags").unwrap(),
            Cell::List(Values::from(vec!["b", "c"]))
        );
    }

    #[test]
    fn test_reserved_names_rejected() {
        for reserved in RESERVED_NAMES {
            let err = TableBuilder::new("t", "")
                .with_values(reserved, vec![1i64])
                .build()
                .unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
        }
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = TableBuilder::new("t", "")
            .with_column(VectorData::new("a", "", vec![1i64]))
            .with_values("a", vec![2i64])
            .build()
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
    }

    #[test]
    fn test_duplicate_row_ids_rejected() {
        let err = TableBuilder::new("t", "")
            .with_row_ids(vec![1, 1])
            .with_column(VectorData::new("a", "", vec![1i64, 2]))
            .build()
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
    }

    #[test]
    fn test_partial_column_order() {
        let table = TableBuilder::new("t", "")
            .with_column(VectorData::new("a", "", vec![1i64]))
            .with_column(VectorData::new("b", "", vec![2i64]))
            .with_column(VectorData::new("c", "", vec![3i64]))
            .with_column_order(["c", "a"])
            .build()
            .unwrap();
        assert_eq!(table.column_names(), &["c", "a", "b"]);
    }

    #[test]
    fn test_column_order_unknown_name() {
        let err = TableBuilder::new("t", "")
            .with_column(VectorData::new("a", "", vec![1i64]))
            .with_column_order(["nope"])
            .build()
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::UnknownColumn { column, .. } if column == "nope"
        ));
    }

    #[test]
    fn test_row_record() {
        let table = ragged_table();
        let record = table.row(1).unwrap();
        assert_eq!(
            record.names().collect::<Vec<_>>(),
            ["id", "start_time", "spike_times"]
        );
        assert_eq!(record["id"], Cell::Scalar(Value::Int(1)));
        assert_eq!(record["start_time"], Cell::Scalar(Value::Float(5.0)));
    }

    #[test]
    fn test_out_of_range() {
        let table = ragged_table();
        let err = table.row(3).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::OutOfRange { index: 3, len: 3, .. }
        ));
        assert!(table.cell(17, "start_time").is_err());
    }

    #[test]
    fn test_unknown_column() {
        let table = ragged_table();
        let err = table.cell(0, "nope").unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::UnknownColumn { table, column } if table == "trials" && column == "nope"
        ));
    }

    #[test]
    fn test_select_preserves_identity_and_raggedness() {
        let table = ragged_table();
        let sub = table.select(&[2, 0]).unwrap();
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.ids(), &[2, 0]);
        assert_eq!(
            sub.cell(0, "spike_times").unwrap(),
            Cell::List(Values::from(vec![60.0f64, 70.0, 80.0, 90.0]))
        );
        assert_eq!(
            sub.cell(1, "spike_times").unwrap(),
            Cell::List(Values::from(vec![10.0f64, 20.0, 30.0]))
        );
        assert_eq!(sub.cell(1, "start_time").unwrap(), Cell::Scalar(Value::Float(0.0)));
    }

    #[test]
    fn test_select_rejects_repeated_rows() {
        // A repeated row position would duplicate ids the builder
        // guarantees unique.
        let table = ragged_table();
        let err = table.select(&[0, 0]).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
        assert!(table.select(&[1, 1, 2]).is_err());
    }

    #[test]
    fn test_slice() {
        let table = ragged_table();
        let sub = table.slice(1..3).unwrap();
        assert_eq!(sub.ids(), &[1, 2]);
        assert!(table.slice(1..4).is_err());
    }

    #[test]
    fn test_project() {
        let table = ragged_table();
        let sub = table.project(&[0, 1], &["spike_times"]).unwrap();
        assert_eq!(sub.column_names(), &["spike_times"]);
        assert_eq!(sub.ids(), &[0, 1]);
        assert!(sub.cell(0, "start_time").is_err());
        assert_eq!(
            sub.cell(1, "spike_times").unwrap(),
            Cell::List(Values::from(vec![40.0f64, 50.0]))
        );
    }

    #[test]
    fn test_project_rejects_repeated_columns() {
        let table = ragged_table();
        let err = table
            .project(&[0, 1], &["start_time", "start_time"])
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));

        // A valid projection still carries each name exactly once.
        let sub = table.project(&[0, 1], &["start_time"]).unwrap();
        assert_eq!(sub.column_names(), &["start_time"]);
        assert_eq!(
            sub.row(0).unwrap().names().collect::<Vec<_>>(),
            ["id", "start_time"]
        );
    }

    #[test]
    fn test_rows_iterator() {
        let table = ragged_table();
        let records: Vec<_> = table.rows().collect::<Result<_>>().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2]["id"], Cell::Scalar(Value::Int(2)));
    }

    #[test]
    fn test_append_plain_column() {
        let mut table = ragged_table();
        table
            .append(TableItem::Column(VectorData::new(
                "stop_time",
                "",
                vec![4.0f64, 8.0, 12.0],
            )))
            .unwrap();
        assert_eq!(
            table.column_names(),
            &["start_time", "spike_times", "stop_time"]
        );
        assert_eq!(table.cell(2, "stop_time").unwrap(), Cell::Scalar(Value::Float(12.0)));
    }

    #[test]
    fn test_append_length_checked() {
        let mut table = ragged_table();
        let err = table
            .append(TableItem::Column(VectorData::new("x", "", vec![1i64])))
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::EqualLengthViolation { .. }));
        // The failed append left the table unchanged.
        assert_eq!(table.column_names(), &["start_time", "spike_times"]);
        assert!(!table.has_column("x"));
    }

    #[test]
    fn test_append_column_links_free_index() {
        let mut table = TableBuilder::new("t", "")
            .with_column(VectorData::new("a", "", vec![1i64, 2]))
            .with_values("obs_index", vec![2i64, 3])
            .build()
            .unwrap();
        table
            .append(TableItem::Column(VectorData::new(
                "obs",
                "",
                vec![10i64, 20, 30],
            )))
            .unwrap();
        assert_eq!(
            table.cell(0, "obs").unwrap(),
            Cell::List(Values::from(vec![10i64, 20]))
        );
        assert_eq!(
            table.cell(1, "obs").unwrap(),
            Cell::List(Values::from(vec![30i64]))
        );
        assert!(!table.has_column("obs_index"));
    }

    #[test]
    fn test_append_index_attaches_to_existing_column() {
        let mut table = TableBuilder::new("t", "")
            .with_column(VectorData::new("v", "", vec![1i64, 2, 3, 4]))
            .with_row_ids(vec![0, 1])
            .build();
        // Four flat rows against two ids fails eagerly, so build the table
        // the other way: two plain rows first, then widen.
        assert!(table.is_err());

        let mut table = TableBuilder::new("t", "")
            .with_column(VectorData::new("v", "", vec![1i64, 2]))
            .build()
            .unwrap();
        let err = table
            .append(TableItem::Index(VectorIndex::new(
                "v_index",
                Offsets::from_bounds(&[1, 3]).unwrap(),
            )))
            .unwrap_err();
        // Last offset must cover the target.
        assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));

        table
            .append(TableItem::Index(VectorIndex::new(
                "v_index",
                Offsets::from_bounds(&[0, 2]).unwrap(),
            )))
            .unwrap();
        assert_eq!(
            table.cell(0, "v").unwrap(),
            Cell::List(Values::from(Vec::<i64>::new()))
        );
        assert_eq!(
            table.cell(1, "v").unwrap(),
            Cell::List(Values::from(vec![1i64, 2]))
        );

        let err = table
            .append(TableItem::Index(
                VectorIndex::new("again", Offsets::from_bounds(&[1, 2]).unwrap())
                    .with_target("v"),
            ))
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::AmbiguousIndexTarget { .. }));
    }

    #[test]
    fn test_append_values_coerces() {
        let mut table = ragged_table();
        table.append_values("condition", vec!["go", "stop", "go"]).unwrap();
        assert_eq!(
            table.cell(0, "condition").unwrap(),
            Cell::Scalar(Value::Text("go".into()))
        );
    }
}
