//! Conversion of [`Table`]s into polars frames for the export layer.

use crate::types::table::Table;
use polars::prelude::{
    DataFrame, DataType, IntoColumn, IntoLazy, JsonFormat, JsonReader, LazyFrame, PolarsError,
    SerReader, Series,
};
use std::io::Cursor;

impl Table {
    /// Builds a `DataFrame` with one column per table column, in order.
    ///
    /// Column types are inferred from the values. A table without rows gives
    /// an empty frame whose columns are all of the null type.
    pub fn to_data_frame(&self) -> Result<DataFrame, PolarsError> {
        if self.rows.is_empty() {
            let columns = self
                .columns
                .iter()
                .map(|name| Series::full_null(name.as_str().into(), 0, &DataType::Null).into_column())
                .collect();
            return DataFrame::new(columns);
        }

        let mut lines = Vec::new();
        for row in &self.rows {
            serde_json::to_writer(&mut lines, row)
                .map_err(|e| PolarsError::ComputeError(e.to_string().into()))?;
            lines.push(b'\n');
        }

        let frame = JsonReader::new(Cursor::new(lines))
            .with_json_format(JsonFormat::JsonLines)
            .finish()?;
        // Schema inference does not promise the row key order.
        frame.select(self.columns.iter().map(String::as_str))
    }

    pub fn to_lazy_frame(&self) -> Result<LazyFrame, PolarsError> {
        Ok(self.to_data_frame()?.lazy())
    }
}
