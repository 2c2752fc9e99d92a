use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tracing::info;

use textiq::api::{ApiGateway, DEFAULT_SLIDES, HttpGateway, Tone};
use textiq::cli::run_chat;
use textiq::config::ClientConfig;
use textiq::error::Error;
use textiq::files::{FileUpload, format_size};
use textiq::pages::{
    Dashboard, PageContext, PresentationPage, QaPage, TracingNotifier, TransformPage, UploadPage,
};

#[derive(Parser)]
#[command(name = "textiq", version, about = "Smart content tools backed by the TextIQ service")]
struct Cli {
    /// Backend base URL. Overrides TEXTIQ_BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds. Overrides TEXTIQ_TIMEOUT_SECS.
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check backend health and list the available tools.
    Health,
    /// List the tones the backend offers.
    Tones,
    /// Rewrite text in another tone. Pass `-` to read stdin.
    Transform {
        text: String,
        #[arg(long, short, default_value_t = Tone::Formal)]
        tone: Tone,
        #[arg(long, short)]
        instructions: Option<String>,
        /// Also write the result to this file.
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Ask a question about some text or an uploaded file.
    Ask {
        question: String,
        /// Context text. Pass `-` to read stdin.
        #[arg(long, short, conflicts_with = "file")]
        context: Option<String>,
        /// Upload this file and answer from its content.
        #[arg(long, short)]
        file: Option<PathBuf>,
    },
    /// Generate a PowerPoint deck and download it. Pass `-` to read stdin.
    Present {
        text: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, short, default_value_t = DEFAULT_SLIDES)]
        slides: u32,
        #[arg(long)]
        no_notes: bool,
        /// Directory to save the deck into.
        #[arg(long, short, default_value = ".")]
        out: PathBuf,
    },
    /// Upload files and print their extracted text.
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Show what the backend holds for an uploaded file.
    FileInfo { file_id: String },
    /// List the file types the backend accepts.
    FileTypes,
    /// Interactive Q&A session.
    Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config =
        ClientConfig::from_env()?.with_overrides(cli.base_url.as_deref(), cli.timeout_secs)?;
    info!(base_url = %config.base_url, "Using TextIQ backend");

    let gateway: Arc<dyn ApiGateway> = Arc::new(HttpGateway::new(&config)?);
    let ctx = PageContext::new(gateway, Arc::new(TracingNotifier));

    // Failures have already been reported through the notifier.
    Ok(run(cli.command, ctx).await.unwrap_or(ExitCode::FAILURE))
}

async fn run(command: Command, ctx: PageContext) -> Result<ExitCode, Error> {
    match command {
        Command::Health => {
            let dashboard = Dashboard::new(ctx.clone());
            match dashboard.check_health().await {
                Ok(status) => println!("Backend status: {}", status.status),
                Err(e) => {
                    ctx.notifier.error(&e.to_string());
                    return Err(e);
                }
            }
            for feature in dashboard.features() {
                println!("\n{}  ({})", feature.title, feature.route);
                println!("  {}", feature.description);
                println!("  {}", feature.examples.join(" • "));
            }
        }
        Command::Tones => {
            let mut page = TransformPage::new(ctx);
            for tone in page.load_tones().await? {
                println!("{:<12} {}", tone.value, tone.description);
            }
        }
        Command::Transform {
            text,
            tone,
            instructions,
            out,
        } => {
            let mut page = TransformPage::new(ctx.clone());
            page.input_text = notify_err(&ctx, read_arg(text).await)?;
            page.tone = tone;
            page.additional_instructions = instructions.unwrap_or_default();
            println!("{}", page.transform().await?);
            if let Some(out) = out {
                page.export(out).await?;
            }
        }
        Command::Ask {
            question,
            context,
            file,
        } => {
            let mut page = QaPage::new(ctx.clone());
            if let Some(path) = file {
                let upload = notify_err(&ctx, FileUpload::from_path(&path).await)?;
                let outcome = page.upload_files(std::slice::from_ref(&upload)).await;
                let Some(Ok(file)) = outcome.into_iter().next().map(|o| o.result) else {
                    return Ok(ExitCode::FAILURE);
                };
                page.select_file(&file.file_id)?;
            }
            if let Some(context) = context {
                page.context_text = notify_err(&ctx, read_arg(context).await)?;
            }
            page.question = question;
            let turn = page.ask().await?;
            println!("{}", turn.answer);
        }
        Command::Present {
            text,
            title,
            slides,
            no_notes,
            out,
        } => {
            let mut page = PresentationPage::new(ctx.clone());
            page.input_text = notify_err(&ctx, read_arg(text).await)?;
            page.title = title.unwrap_or_default();
            page.slide_count = slides;
            page.include_speaker_notes = !no_notes;
            let deck = page.generate().await?;
            println!("{} ({} slides)", deck.title, deck.slide_count);
            let path = page.download(out).await?;
            println!("Saved {}", path.display());
        }
        Command::Upload { paths } => {
            let mut uploads = Vec::with_capacity(paths.len());
            for path in &paths {
                uploads.push(notify_err(&ctx, FileUpload::from_path(path).await)?);
            }
            let mut page = UploadPage::new(ctx);
            let failed = page
                .upload(&uploads)
                .await
                .iter()
                .filter(|o| o.result.is_err())
                .count();
            for file in page.files().iter() {
                println!(
                    "{}  {}  {}",
                    file.file_id,
                    file.display_name(),
                    format_size(file.file_size)
                );
                println!("{}\n", file.extracted_text);
            }
            if failed > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::FileInfo { file_id } => {
            let page = UploadPage::new(ctx.clone());
            let info = notify_err(&ctx, page.info(&file_id).await)?;
            println!(
                "{}  {}  {}  {}",
                info.file_id,
                info.filename,
                info.file_type,
                format_size(info.file_size)
            );
            if !info.exists {
                println!("(no longer stored on the server)");
                return Ok(ExitCode::FAILURE);
            }
            let content = page.stored_content(&file_id).await?;
            println!("\n{}", content.content);
            if content.full_length > content.content.chars().count() {
                println!("... ({} characters in total)", content.full_length);
            }
        }
        Command::FileTypes => {
            let mut page = UploadPage::new(ctx.clone());
            if page.load_supported_types().await.is_none() {
                ctx.notifier.error("Failed to load supported file types");
                return Ok(ExitCode::FAILURE);
            }
            if let Some(types) = page.supported_types() {
                for t in &types.supported_types {
                    println!("{:<6} {:<40} {}", t.extension, t.description, t.mime_type);
                }
            }
            println!("Max file size: {} MB", page.max_file_size_mb());
        }
        Command::Chat => {
            let mut page = QaPage::new(ctx.clone());
            notify_err(&ctx, run_chat(&mut page).await)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn notify_err<T>(ctx: &PageContext, result: Result<T, Error>) -> Result<T, Error> {
    if let Err(e) = &result {
        ctx.notifier.error(&e.to_string());
    }
    result
}

/// `-` means read the whole of stdin.
async fn read_arg(value: String) -> Result<String, Error> {
    if value != "-" {
        return Ok(value);
    }
    let mut buf = String::new();
    tokio::io::stdin().read_to_string(&mut buf).await?;
    Ok(buf)
}
