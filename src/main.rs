use clap::Parser;
use marginalia::config::{Cli, Config};
use marginalia::error::ImportError;
use marginalia::import::{ImportReport, ImportService};
use marginalia::notion::NotionPublisher;
use marginalia::source::FileClippingSource;
use marginalia::{notion_url, unpack_error};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if args.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match run(&args).await {
        Ok(report) => print_report(&report),
        Err(e) => {
            tracing::error!(error = %unpack_error(&e), "import failed");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(args: &Cli) -> Result<ImportReport, ImportError> {
    if !args.clippings_file.exists() {
        return Err(ImportError::SourceNotFound(args.clippings_file.clone()));
    }

    let cfg = Config::load(args.config_path.as_deref()).map_err(|e| ImportError::Config(format!("{:#}", e)))?;
    let token = cfg
        .notion
        .resolve_token(args.api_token.as_deref())
        .ok_or(ImportError::MissingToken)?;

    let publisher =
        NotionPublisher::new(&token, &cfg.notion).map_err(|e| ImportError::Config(unpack_error(&e)))?;
    let service = ImportService::new(FileClippingSource::new(), publisher);

    let source = args.clippings_file.to_string_lossy();
    tracing::info!(source = %source, parent = %args.parent_page_id, "importing clippings");

    service.import_clippings(&source, &args.parent_page_id).await
}

fn print_report(report: &ImportReport) {
    println!("Found {} total clippings", report.total_clippings);
    println!("Found {} highlights", report.highlight_count);
    println!("Found {} books with highlights:", report.books.len());
    for book in &report.books {
        println!("  • {}: {} highlights", book.title, book.highlight_count);
    }

    println!();
    println!("Created {} book pages:", report.page_count());
    for book in &report.books {
        println!("  • {}", book.title);
        for page_id in &book.page_ids {
            println!("    Page ID: {}", page_id);
            println!("    URL: {}", notion_url(page_id));
        }
    }
}
