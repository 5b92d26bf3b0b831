use std::fs;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use anyhow::Context;
use futures::future;
use tokio::task::{self, JoinHandle};

const EMBEDDED_HASH_PREFIX: &'static str = "# hash:";

pub const QUERIES_FILE_NAME: &'static str = "queries.graphql";
pub const SCHEMA_FILE_NAME: &'static str = "schema.graphql";

pub struct OutputOptions {
    pub line_break: String,
}

/// Printed documents to place in the output directory.
pub struct GeneratedFiles {
    pub queries: String,
    pub schema: String,
}

pub async fn write_files(
    files: &GeneratedFiles,
    output_directory: &Path,
    options: &OutputOptions
) -> anyhow::Result<()> {
    if !output_directory.exists() {
        fs::create_dir(output_directory).with_context(|| {
            format!("Unable to create output directory {}, does the parent folder exist?", output_directory.display())
        })?;
    }

    let write_queries_task = spawn_write(output_directory.join(QUERIES_FILE_NAME), &files.queries, options, QUERIES_FILE_NAME);
    let write_schema_task = spawn_write(output_directory.join(SCHEMA_FILE_NAME), &files.schema, options, SCHEMA_FILE_NAME);

    let (queries, schema) = future::join(write_queries_task, write_schema_task).await;
    queries??;
    schema?
}

fn spawn_write(
    path: PathBuf,
    content: &str,
    options: &OutputOptions,
    file_name: &'static str
) -> JoinHandle<anyhow::Result<()>> {
    let content = content.to_string();
    let options = OutputOptions { line_break: options.line_break.clone() };
    task::spawn_blocking(move || {
        let result = overwrite_on_diff(&path, &content, &options)?;
        result.log(file_name);
        anyhow::Ok(())
    })
}

fn overwrite_on_diff(file_path: &PathBuf, new_content: &str, options: &OutputOptions) -> anyhow::Result<FileWriteResult> {
    let new_content = new_content.replace("\n", &options.line_break);
    let new_content_hash = crc32fast::hash(new_content.as_bytes());

    if file_path.exists() {
        if read_embedded_hash(file_path)? == Some(new_content_hash) {
            return Ok(FileWriteResult::NoChange);
        }
        let mut file = File::create(file_path)
            .with_context(|| format!("Unable to create or truncate file {}", file_path.display()))?;
        write_all_with_hash(&mut file, &new_content, new_content_hash, options)
            .with_context(|| format!("Unable to write to file {}", file_path.display()))?;
        Ok(FileWriteResult::Overwritten)
    } else {
        let mut file = File::create_new(file_path)
            .with_context(|| format!("Unable to create file {}", file_path.display()))?;
        write_all_with_hash(&mut file, &new_content, new_content_hash, options)
            .with_context(|| format!("Unable to write to file {}", file_path.display()))?;
        Ok(FileWriteResult::Created)
    }
}

fn read_embedded_hash(path: &PathBuf) -> anyhow::Result<Option<u32>> {
    let file = File::open(path)
        .with_context(|| format!("Failed while trying to open {} in order to read hash", path.display()))?;
    let mut reader = BufReader::new(&file);
    let mut hash_line = String::new();
    reader.read_line(&mut hash_line)
        .with_context(|| format!("Failed while trying to read first line from {}", path.display()))?;

    let hash = hash_line
        .strip_prefix(EMBEDDED_HASH_PREFIX)
        .and_then(|hash_string| hash_string.trim_end().parse().ok());
    Ok(hash)
}

fn write_all_with_hash(file: &mut File, new_content: &str, hash: u32, options: &OutputOptions) -> Result<(), std::io::Error> {
    let content_with_hash = format!("{}{}{}{}", EMBEDDED_HASH_PREFIX, hash, options.line_break, new_content);
    file.write_all(content_with_hash.as_bytes())
}

#[derive(Debug, PartialEq, Eq)]
enum FileWriteResult {
    Overwritten,
    NoChange,
    Created
}

impl FileWriteResult {
    fn log(&self, file_name: &str) {
        match &self {
            FileWriteResult::Created => tracing::info!("{} - created", file_name),
            FileWriteResult::NoChange => tracing::info!("{} - skipped (no change)", file_name),
            FileWriteResult::Overwritten => tracing::info!("{} - overwritten", file_name)
        }
    }
}
