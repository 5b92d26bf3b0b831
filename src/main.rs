use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use anyhow::{Context, bail};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use crate::error::SchemaLoadError;
use crate::generator::SchemaDocument;
use crate::output_writer::{GeneratedFiles, OutputOptions};

mod error;
mod generator;
mod naming;
mod operations;
mod output_writer;
mod scanner;
mod schema_introspection;
mod schema_sdl;
mod selection;


const DEFAULT_CONFIG_PATH: &'static str = "entity-queries.json";
const DEFAULT_INDENT: u32 = 2;
const DEFAULT_PROFILE_NAME: &'static str = "default";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run(Cli::parse()).await {
        tracing::error!("{:#}", error);
        std::process::exit(1);
    }
}

async fn run(args: Cli) -> anyhow::Result<()> {
    let config = read_config_from_args(&args)?;
    let options = resolve_options(args, config)?;
    execute(options).await
}

fn resolve_options(args: Cli, config: Option<CodegenJsonConfig>) -> anyhow::Result<CodegenOptions> {
    let indent = config
        .as_ref()
        .and_then(|c| c.indent)
        .unwrap_or(DEFAULT_INDENT);

    let line_break = config
        .as_ref()
        .and_then(|c| c.line_break.clone())
        .unwrap_or_else(default_line_break);

    let output_directory = match args.output.or_else(|| config.as_ref().and_then(|c| c.output_directory.clone())) {
        Some(output) => output,
        None => bail!("No output directory was given"),
    };

    let (fetch, process) = if let Some(url) = args.url {
        (FetchMethod::Endpoint { url }, ProcessMethod::Introspection)
    } else if let Some(file) = args.file {
        (FetchMethod::File { path: PathBuf::from(file) }, ProcessMethod::Sdl)
    } else if let Some(config) = &config {
        let profile_name = args.profile.unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_string());
        let Some(profiles) = &config.profiles else {
            bail!("No method to fetch schema was provided and default profile is not defined in config file")
        };
        match profiles.get(&profile_name) {
            Some(ConfigProfile::Endpoint { url }) => {
                (FetchMethod::Endpoint { url: url.to_string() }, ProcessMethod::Introspection)
            }
            Some(ConfigProfile::File { path }) => {
                (FetchMethod::File { path: PathBuf::from(path) }, ProcessMethod::Sdl)
            }
            Some(ConfigProfile::PipeResponse) => (FetchMethod::Pipe, ProcessMethod::Introspection),
            Some(ConfigProfile::PipeSdl) => (FetchMethod::Pipe, ProcessMethod::Sdl),
            None => bail!("No profile named \"{}\"", profile_name),
        }
    } else {
        bail!("No method to fetch schema was provided")
    };

    Ok(CodegenOptions {
        indent,
        line_break,
        output_directory: PathBuf::from(output_directory),
        fetch,
        process
    })
}

fn read_config_from_args(args: &Cli) -> anyhow::Result<Option<CodegenJsonConfig>> {
    match &args.config {
        Some(path) => match read_config(Path::new(path))? {
            Some(config) => Ok(Some(config)),
            None => bail!("Unable to locate config file {}", path),
        },
        None => read_config(Path::new(DEFAULT_CONFIG_PATH)),
    }
}

fn read_config(path: &Path) -> anyhow::Result<Option<CodegenJsonConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let config_content = std::fs::read_to_string(path)
        .with_context(|| format!("Unable to read config file {}", path.display()))?;
    parse_config(&config_content)
        .with_context(|| format!("Invalid config file {}", path.display()))
        .map(Some)
}

fn parse_config(content: &str) -> anyhow::Result<CodegenJsonConfig> {
    let deserializer = &mut serde_json::Deserializer::from_str(content);
    Ok(serde_path_to_error::deserialize(deserializer)?)
}

#[derive(Parser)]
#[command(about = "Generates GetOne/GetMany queries for every entity of a subgraph schema")]
struct Cli {
    #[arg(short, long, help = "Path to config file from working directory, default: entity-queries.json")]
    config: Option<String>,
    #[arg(short, long, help = "Profile used from config file, default: default")]
    profile: Option<String>,
    #[arg(short, long, help = "Generates queries from introspection, override config file")]
    url: Option<String>,
    #[arg(short, long, help = "Generates queries from SDL in file, override config file")]
    file: Option<String>,
    #[arg(short, long, help = "Output directory, override config file")]
    output: Option<String>,
}

fn default_line_break() -> String {
    if cfg!(windows) {
        "\r\n"
    } else {
        "\n"
    }.to_string()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CodegenJsonConfig {
    profiles: Option<HashMap<String, ConfigProfile>>,
    output_directory: Option<String>,
    line_break: Option<String>,
    indent: Option<u32>,
}

#[derive(Deserialize)]
#[serde(tag = "method")]
enum ConfigProfile {
    Endpoint { url: String },
    File { path: String },
    PipeResponse,
    PipeSdl
}

async fn execute(options: CodegenOptions) -> anyhow::Result<()> {
    let raw_content = match &options.fetch {
        FetchMethod::Endpoint { url } => read_endpoint(url).await?,
        FetchMethod::File { path } => read_file(path).await?,
        FetchMethod::Pipe => read_pipe()?,
    };
    let schema: SchemaDocument = match options.process {
        ProcessMethod::Introspection => schema_introspection::from_response_body(&raw_content)?,
        ProcessMethod::Sdl => schema_sdl::from_sdl_string(&raw_content)?,
    };
    tracing::info!("Loaded schema with {} definitions", schema.definitions.len());

    let document = generator::generate_document(&schema)?;
    tracing::info!("Generated {} operations", document.definitions.len());

    let queries = generator::print_document(&document, options.indent);
    tracing::debug!("{}", queries);

    let files = GeneratedFiles {
        queries,
        schema: generator::print_schema(&schema, options.indent),
    };
    let write_options = OutputOptions { line_break: options.line_break };
    output_writer::write_files(&files, &options.output_directory, &write_options).await
}

struct CodegenOptions {
    output_directory: PathBuf,
    line_break: String,
    indent: u32,
    fetch: FetchMethod,
    process: ProcessMethod
}

enum FetchMethod {
    File { path: PathBuf },
    Endpoint { url: String },
    Pipe,
}

enum ProcessMethod {
    Sdl,
    Introspection
}

async fn read_file(path: &Path) -> anyhow::Result<String> {
    tracing::info!("Reading schema from {}", path.display());
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Unable to read schema file {}", path.display()))
}

async fn read_endpoint(url: &str) -> Result<String, SchemaLoadError> {
    tracing::info!("Fetching schema from {}", url);
    let input_body = GraphQLQuery { query: schema_introspection::INTROSPECTION_QUERY };
    let http_error = |source| SchemaLoadError::Http { url: url.to_string(), source };
    reqwest::Client::new()
        .post(url)
        .json(&input_body)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(http_error)?
        .text()
        .await
        .map_err(http_error)
}

fn read_pipe() -> anyhow::Result<String> {
    tracing::info!("Reading schema from stdin");
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer).context("Unable to read schema from stdin")?;
    Ok(buffer)
}

#[derive(Serialize)]
struct GraphQLQuery {
    query: &'static str
}
