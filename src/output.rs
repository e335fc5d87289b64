use crate::error::Error;
use crate::pipeline::Pipeline;
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes the validated rows as newline-delimited JSON next to the
/// destination column schema, ready for a warehouse load.
///
/// # Arguments
/// * `pipeline` - The pipeline that produced the rows.
/// * `account_id` - The account the rows were fetched for.
/// * `rows` - The validated insight rows.
/// * `output_dir` - The directory to write both files into.
///
/// # Returns
/// A Result containing either `()` or an [`Error`]
pub fn write_rows_and_schema(
    pipeline: &Pipeline,
    account_id: &str,
    rows: &[Map<String, Value>],
    output_dir: &str,
) -> Result<(), Error> {
    fs::create_dir_all(output_dir)?;

    let rows_path = rows_path(pipeline, account_id, output_dir);
    let mut writer = BufWriter::new(File::create(&rows_path)?);
    for row in rows {
        serde_json::to_writer(&mut writer, row)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    let schema_file = File::create(schema_path(pipeline, output_dir))?;
    serde_json::to_writer_pretty(schema_file, &pipeline.schema)?;

    Ok(())
}

pub fn rows_path(pipeline: &Pipeline, account_id: &str, output_dir: &str) -> PathBuf {
    Path::new(output_dir).join(format!("{}-{}.ndjson", pipeline.name, account_id))
}

pub fn schema_path(pipeline: &Pipeline, output_dir: &str) -> PathBuf {
    Path::new(output_dir).join(format!("{}-schema.json", pipeline.name))
}
