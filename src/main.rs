use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::Path;

use docpdf::cli::{Args, Command, CompressArgs, ConvertArgs, ServeArgs};
use docpdf::config::Settings;
use docpdf::convert::{compress_document, convert_documents};
use docpdf::model::{CompressionLevel, CompressionRequest, SourceDocument};

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; RUST_LOG still wins when set
    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .parse_default_env()
        .init();

    match args.command {
        Command::Serve(serve) => run_server(&serve),
        Command::Convert(convert) => run_convert(&convert),
        Command::Compress(compress) => run_compress(&compress),
    }
}

fn run_server(args: &ServeArgs) -> Result<()> {
    let config = args.to_config().context("Invalid server configuration")?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime
        .block_on(docpdf::server::serve(config))
        .context("Server error")
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn run_convert(args: &ConvertArgs) -> Result<()> {
    let documents = args
        .inputs
        .iter()
        .map(|path| {
            fs::read(path)
                .with_context(|| format!("Failed to read input file: {}", path.display()))
                .map(|bytes| SourceDocument::new(file_name(path), bytes))
        })
        .collect::<Result<Vec<_>>>()?;

    log::info!("Converting {} document(s)", documents.len());

    let settings = Settings::for_page_size(args.page_size).with_title(args.title);
    let bundle = convert_documents(documents, !args.zip, &settings)
        .context("Failed to convert documents")?;

    let output_path = args.output_path();
    let mime_type = bundle.mime_type();
    bundle.deliver(|bundle| {
        fs::write(&output_path, bundle.bytes())
            .with_context(|| format!("Failed to write output file: {}", output_path.display()))
    })?;

    println!("Successfully wrote {} to {}", mime_type, output_path.display());
    Ok(())
}

fn run_compress(args: &CompressArgs) -> Result<()> {
    let bytes = fs::read(&args.input)
        .with_context(|| format!("Failed to read input file: {}", args.input.display()))?;
    let level = CompressionLevel::new(args.level as i64)?;

    let request = CompressionRequest::new(file_name(&args.input), bytes, level);
    let compressed = compress_document(request).context("Failed to compress PDF")?;

    let output_path = args.output_path();
    let report = compressed.report;
    compressed.deliver(|compressed| {
        fs::write(&output_path, &compressed.bytes)
            .with_context(|| format!("Failed to write output file: {}", output_path.display()))
    })?;

    println!(
        "Successfully wrote {} ({} -> {} bytes, {:.1}% smaller)",
        output_path.display(),
        report.original_size,
        report.compressed_size,
        report.ratio()
    );
    Ok(())
}
